// 缓存闸门
//
// 读：命中时只刷新 fromCache/cacheTime，记录其余部分保持写入时的样子。
// 写：只缓存拿到可用片名的记录。存储不可用时所有请求都按未命中处理。

use std::sync::Arc;
use std::time::Duration;

use crate::external::cache::{CacheStats, CacheStore};
use crate::models::MovieRecord;
use crate::services::error::CacheError;

#[derive(Clone)]
pub struct CacheGate {
    store: Option<Arc<dyn CacheStore>>,
    ttl: Duration,
    version: String,
}

impl CacheGate {
    pub fn new(store: Option<Arc<dyn CacheStore>>, ttl: Duration, version: impl Into<String>) -> Self {
        Self {
            store,
            ttl,
            version: version.into(),
        }
    }

    /// 不使用缓存
    pub fn disabled() -> Self {
        Self::new(None, Duration::ZERO, env!("CARGO_PKG_VERSION"))
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 缓存键：`movie:{movieId}:v{version}`
    pub fn key(&self, movie_id: &str) -> String {
        format!("movie:{}:v{}", movie_id, self.version)
    }

    fn store(&self) -> Result<&Arc<dyn CacheStore>, CacheError> {
        self.store.as_ref().ok_or(CacheError::CacheUnavailable)
    }

    /// 读取缓存记录，命中时刷新来源字段
    pub async fn get(&self, movie_id: &str) -> Option<MovieRecord> {
        let key = self.key(movie_id);
        let cached = match self.store() {
            Ok(store) => store.get(&key).await,
            Err(e) => {
                tracing::trace!("Skipping cache read for {}: {}", key, e);
                return None;
            }
        };

        let raw = match cached {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Cache read failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str::<MovieRecord>(&raw).map_err(CacheError::from) {
            Ok(mut record) => {
                record.meta.mark_cached();
                tracing::debug!("Cache hit: {}", key);
                Some(record)
            }
            Err(e) => {
                // 无法解析的旧数据按未命中处理
                tracing::warn!("Discarding undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// 写入缓存，返回是否真正写入
    pub async fn put(&self, record: &MovieRecord) -> bool {
        if !record.has_data || !record.basic.has_usable_name() {
            tracing::debug!("Not caching {}: no usable movie name", record.movie_id);
            return false;
        }

        let store = match self.store() {
            Ok(store) => store,
            Err(_) => return false,
        };

        let key = self.key(&record.movie_id);
        let result = match serde_json::to_string(record) {
            Ok(json) => store.put(&key, json, self.ttl).await,
            Err(e) => Err(CacheError::from(e)),
        };

        match result {
            Ok(()) => {
                tracing::debug!("Cached {} for {}s", key, self.ttl.as_secs());
                true
            }
            Err(e) => {
                tracing::warn!("Cache write failed for {}: {}", key, e);
                false
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            enabled: self.is_enabled(),
            entries: self.store.as_ref().map(|s| s.entry_count()).unwrap_or(0),
            ttl_secs: self.ttl.as_secs(),
            version: self.version.clone(),
        }
    }
}
