pub mod cache;
pub mod maoyan;

pub use cache::{CacheMaintenanceTask, CacheStats, CacheStore, MokaCacheStore};
pub use maoyan::{MaoyanClient, MovieSource};
