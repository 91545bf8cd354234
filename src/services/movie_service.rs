// 影片查询服务
//
// 流程：缓存命中直接返回；否则并发请求票房页面和影片 API，两者都结束后
// 解析、合并、写缓存。票房页面失败则整个请求失败，API 失败只做标注。

use std::sync::Arc;
use std::time::Instant;

use crate::external::MovieSource;
use crate::models::{MovieRecord, RecordMeta};
use crate::services::cache_gate::CacheGate;
use crate::services::error::ScrapeError;
use crate::services::merger::{self, MergePolicy, SecondaryRecord};
use crate::services::page_parser;

pub struct MovieService {
    source: Arc<dyn MovieSource>,
    cache: CacheGate,
    policy: MergePolicy,
}

impl MovieService {
    pub fn new(source: Arc<dyn MovieSource>, cache: CacheGate, policy: MergePolicy) -> Self {
        Self {
            source,
            cache,
            policy,
        }
    }

    pub fn cache(&self) -> &CacheGate {
        &self.cache
    }

    pub fn source(&self) -> &dyn MovieSource {
        self.source.as_ref()
    }

    /// 查询一部影片
    ///
    /// # 返回
    /// - `Ok(MovieRecord)`: 缓存记录或新构建的记录（片名可能是占位值）
    /// - `Err(ScrapeError)`: 票房页面无法获取
    pub async fn lookup(&self, movie_id: &str) -> Result<MovieRecord, ScrapeError> {
        if let Some(record) = self.cache.get(movie_id).await {
            tracing::info!("Serving {} from cache", movie_id);
            return Ok(record);
        }

        let started = Instant::now();
        let record = self.fetch_and_build(movie_id, started).await?;

        if record.has_data {
            self.cache.put(&record).await;
        }

        tracing::info!(
            "Built record for {}: has_data={}, sources={:?}, {}ms",
            movie_id,
            record.has_data,
            record.meta.data_sources,
            record.meta.processing_time
        );
        Ok(record)
    }

    async fn fetch_and_build(&self, movie_id: &str, started: Instant) -> Result<MovieRecord, ScrapeError> {
        let (page, catalog) = tokio::join!(
            self.source.fetch_page(movie_id),
            self.source.fetch_catalog(movie_id)
        );

        let html = page.map_err(|e| {
            tracing::error!("Box office page failed for {}: {}", movie_id, e);
            e
        })?;

        let primary = page_parser::parse_box_office_page(&html, movie_id);
        let mut data_sources = vec![self.source.page_host().to_string()];

        let (secondary, secondary_error) = match catalog {
            Ok(movie) => {
                data_sources.push(self.source.api_host().to_string());
                (Some(SecondaryRecord::from_catalog(movie)), None)
            }
            Err(e) => {
                tracing::warn!("Catalog API failed for {}, using page data only: {}", movie_id, e);
                (None, Some(e.to_string()))
            }
        };

        let merged = merger::merge(&self.policy, primary, secondary.as_ref());

        let elapsed = started.elapsed().as_millis() as u64;
        let mut meta = RecordMeta::fresh(elapsed, data_sources);
        meta.secondary_error = secondary_error;

        Ok(merged.into_record(movie_id, meta))
    }
}
