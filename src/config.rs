// 服务配置
//
// 所有配置项都来自环境变量（启动时先加载 .env），缺省值与线上部署一致

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::services::merger::{MergeField, MergePolicy};

/// 默认的票房页面站点
pub const DEFAULT_PIAOFANG_BASE_URL: &str = "https://piaofang.maoyan.com";
/// 默认的影片元数据 API 站点
pub const DEFAULT_MAOYAN_API_BASE_URL: &str = "https://api.maoyan.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("无效的 URL 配置 {key}: {message}")]
    InvalidUrl { key: &'static str, message: String },

    #[error("未知的合并字段: {0}")]
    UnknownMergeField(String),
}

/// 服务运行配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// 为 false 时不创建缓存存储，所有请求都视为未命中
    pub cache_enabled: bool,
    pub cache_ttl: Duration,
    pub cache_capacity: u64,
    /// 缓存键版本号，记录结构变化时递增即可让旧缓存失效
    pub cache_version: String,
    pub cache_maintenance_interval: Duration,
    pub piaofang_base_url: Url,
    pub api_base_url: Url,
    pub upstream_timeout: Duration,
    pub merge_policy: MergePolicy,
}

impl AppConfig {
    /// 从进程环境变量读取配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置，测试时可以传入固定的表
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let piaofang_base_url = parse_url(
            "PIAOFANG_BASE_URL",
            lookup("PIAOFANG_BASE_URL").as_deref().unwrap_or(DEFAULT_PIAOFANG_BASE_URL),
        )?;
        let api_base_url = parse_url(
            "MAOYAN_API_BASE_URL",
            lookup("MAOYAN_API_BASE_URL").as_deref().unwrap_or(DEFAULT_MAOYAN_API_BASE_URL),
        )?;

        let mut merge_policy = MergePolicy::default();
        if let Some(fields) = lookup("MERGE_PREFER_PRIMARY") {
            for name in fields.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                let field = MergeField::from_name(name)
                    .ok_or_else(|| ConfigError::UnknownMergeField(name.to_string()))?;
                merge_policy = merge_policy.prefer_primary(field);
            }
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8787),
            cache_enabled: parse_or(&lookup, "CACHE_ENABLED", true),
            cache_ttl: Duration::from_secs(parse_or(&lookup, "CACHE_TTL_SECS", 1800)),
            cache_capacity: parse_or(&lookup, "CACHE_CAPACITY", 10_000),
            cache_version: lookup("CACHE_VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            cache_maintenance_interval: Duration::from_secs(parse_or(&lookup, "CACHE_MAINTENANCE_SECS", 300)),
            piaofang_base_url,
            api_base_url,
            upstream_timeout: Duration::from_secs(parse_or(&lookup, "UPSTREAM_TIMEOUT_SECS", 20)),
            merge_policy,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        key,
        message: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            key,
            message: format!("{} 不能作为基础地址", raw),
        });
    }
    Ok(url)
}

/// 解析失败时记录警告并回退到默认值
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Debug,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value for {}: {:?}, using default {:?}", key, raw, default);
            default
        }),
        None => default,
    }
}
