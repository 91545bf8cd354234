use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, PRAGMA, REFERER, USER_AGENT};
use reqwest::Client;
use url::Url;

use crate::config::AppConfig;
use crate::models::{CatalogMovie, CatalogResponse};
use crate::services::error::{ScrapeError, Upstream};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 一部影片的两个上游数据源
#[async_trait]
pub trait MovieSource: Send + Sync {
    /// 票房页面 HTML（主数据源）
    async fn fetch_page(&self, movie_id: &str) -> Result<String, ScrapeError>;

    /// 影片元数据 API（副数据源）
    async fn fetch_catalog(&self, movie_id: &str) -> Result<CatalogMovie, ScrapeError>;

    fn page_host(&self) -> &str;

    fn api_host(&self) -> &str;
}

/// 猫眼客户端
#[derive(Clone)]
pub struct MaoyanClient {
    client: Client,
    page_base: String,
    api_base: String,
    page_host: String,
    api_host: String,
}

impl MaoyanClient {
    pub fn new(page_base: &Url, api_base: &Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            page_base: page_base.as_str().trim_end_matches('/').to_string(),
            api_base: api_base.as_str().trim_end_matches('/').to_string(),
            page_host: page_base.host_str().unwrap_or_default().to_string(),
            api_host: api_base.host_str().unwrap_or_default().to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            &config.piaofang_base_url,
            &config.api_base_url,
            config.upstream_timeout,
        )
    }

    /// 票房页面地址
    pub fn page_url(&self, movie_id: &str) -> String {
        format!("{}/movie/{}", self.page_base, urlencoding::encode(movie_id))
    }

    /// 影片 API 地址
    pub fn api_url(&self, movie_id: &str) -> String {
        format!(
            "{}/mmdb/movie/v3/{}.json",
            self.api_base,
            urlencoding::encode(movie_id)
        )
    }
}

#[async_trait]
impl MovieSource for MaoyanClient {
    async fn fetch_page(&self, movie_id: &str) -> Result<String, ScrapeError> {
        let url = self.page_url(movie_id);
        tracing::debug!("Fetching box office page: {}", url);

        // 添加常见的浏览器 headers
        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, "zh-CN,zh;q=0.9,en;q=0.8")
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .header(REFERER, format!("{}/", self.page_base))
            .send()
            .await
            .map_err(|e| ScrapeError::from_reqwest(Upstream::BoxOfficePage, e))?;

        if !response.status().is_success() {
            return Err(ScrapeError::UpstreamNon2xx {
                upstream: Upstream::BoxOfficePage,
                status: response.status().as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| ScrapeError::from_reqwest(Upstream::BoxOfficePage, e))
    }

    async fn fetch_catalog(&self, movie_id: &str) -> Result<CatalogMovie, ScrapeError> {
        let url = self.api_url(movie_id);
        tracing::debug!("Fetching movie catalog: {}", url);

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(ACCEPT, "application/json, text/plain, */*")
            .header(ACCEPT_LANGUAGE, "zh-CN,zh;q=0.9,en;q=0.8")
            .header(REFERER, self.page_url(movie_id))
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await
            .map_err(|e| ScrapeError::from_reqwest(Upstream::CatalogApi, e))?;

        if !response.status().is_success() {
            return Err(ScrapeError::UpstreamNon2xx {
                upstream: Upstream::CatalogApi,
                status: response.status().as_u16(),
            });
        }

        let payload: CatalogResponse = response
            .json()
            .await
            .map_err(|e| ScrapeError::from_reqwest(Upstream::CatalogApi, e))?;

        payload.into_movie().ok_or_else(|| ScrapeError::ParseFailure {
            upstream: Upstream::CatalogApi,
            message: "响应中缺少 data.movie".to_string(),
        })
    }

    fn page_host(&self) -> &str {
        &self.page_host
    }

    fn api_host(&self) -> &str {
        &self.api_host
    }
}
