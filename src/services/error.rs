// 抓取流程错误类型定义
//
// 票房页面的失败是致命的，影片 API 和缓存的失败只影响结果的完整度

use std::fmt;
use thiserror::Error;

/// 上游数据源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    /// 票房 HTML 页面（主数据源）
    BoxOfficePage,
    /// 影片 JSON API（副数据源）
    CatalogApi,
}

impl Upstream {
    pub fn label(self) -> &'static str {
        match self {
            Upstream::BoxOfficePage => "票房数据",
            Upstream::CatalogApi => "API数据",
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 抓取操作的统一错误类型
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("{upstream}获取失败: {message}")]
    UpstreamUnreachable { upstream: Upstream, message: String },

    #[error("{upstream}获取失败: HTTP {status}")]
    UpstreamNon2xx { upstream: Upstream, status: u16 },

    #[error("{upstream}解析失败: {message}")]
    ParseFailure { upstream: Upstream, message: String },
}

impl ScrapeError {
    pub fn upstream(&self) -> Upstream {
        match self {
            ScrapeError::UpstreamUnreachable { upstream, .. }
            | ScrapeError::UpstreamNon2xx { upstream, .. }
            | ScrapeError::ParseFailure { upstream, .. } => *upstream,
        }
    }

    /// 从 reqwest 错误转换，区分状态码错误与网络错误
    pub fn from_reqwest(upstream: Upstream, err: reqwest::Error) -> Self {
        if err.is_decode() {
            ScrapeError::ParseFailure {
                upstream,
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            ScrapeError::UpstreamNon2xx {
                upstream,
                status: status.as_u16(),
            }
        } else {
            ScrapeError::UpstreamUnreachable {
                upstream,
                message: err.to_string(),
            }
        }
    }
}

/// 缓存存储错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("缓存不可用")]
    CacheUnavailable,

    #[error("缓存记录序列化错误: {0}")]
    Json(#[from] serde_json::Error),
}
