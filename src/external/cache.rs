// 键值缓存存储
//
// 记录以 JSON 字符串保存，每条记录带自己的过期时间。
// 业务代码只通过 `CacheStore` 接口访问，进程内实现基于 moka。

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use serde::Serialize;

use crate::services::error::CacheError;

/// 缓存存储能力
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// 当前条目数（近似值）
    fn entry_count(&self) -> u64;

    async fn clear(&self);

    /// 执行过期清理等挂起的维护工作
    async fn run_maintenance(&self) {}
}

/// 缓存条目
#[derive(Debug, Clone)]
struct CacheEntry {
    body: Arc<str>,
    ttl: Duration,
}

/// 按条目自身的 TTL 过期
struct EntryTtl;

impl Expiry<String, CacheEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    // 覆盖写入时按新条目的 TTL 重新计时
    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// 基于 moka 的进程内缓存
#[derive(Clone)]
pub struct MokaCacheStore {
    cache: Cache<String, CacheEntry>,
}

impl MokaCacheStore {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryTtl)
            .build();
        Self { cache }
    }
}

#[async_trait]
impl CacheStore for MokaCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.cache.get(key).await.map(|entry| entry.body.to_string()))
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let entry = CacheEntry {
            body: Arc::from(value),
            ttl,
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    async fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }

    async fn run_maintenance(&self) {
        self.cache.run_pending_tasks().await;
    }
}

/// 缓存统计信息
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub enabled: bool,
    pub entries: u64,
    pub ttl_secs: u64,
    pub version: String,
}

/// 缓存维护任务
pub struct CacheMaintenanceTask {
    store: Arc<dyn CacheStore>,
    interval: Duration,
}

impl CacheMaintenanceTask {
    pub fn new(store: Arc<dyn CacheStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// 启动定期维护任务
    pub async fn start(self) {
        let mut interval = tokio::time::interval(self.interval);

        loop {
            interval.tick().await;
            self.store.run_maintenance().await;
            tracing::debug!(
                "Cache maintenance completed. Entries: {}",
                self.store.entry_count()
            );
        }
    }
}
