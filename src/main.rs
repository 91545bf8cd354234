use std::net::SocketAddr;
use std::sync::Arc;

use maoyan_box_office::{
    api,
    config::AppConfig,
    external::{CacheMaintenanceTask, CacheStore, MaoyanClient, MokaCacheStore},
    services::{CacheGate, MovieService},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;

    // Initialize cache store
    let cache_store: Option<Arc<dyn CacheStore>> = if config.cache_enabled {
        let store: Arc<dyn CacheStore> = Arc::new(MokaCacheStore::new(config.cache_capacity));
        let task = CacheMaintenanceTask::new(store.clone(), config.cache_maintenance_interval);
        tokio::spawn(task.start());
        Some(store)
    } else {
        tracing::warn!("Cache disabled, every request goes upstream");
        None
    };
    let cache = CacheGate::new(cache_store, config.cache_ttl, config.cache_version.clone());

    // Initialize upstream client
    let source = MaoyanClient::from_config(&config)?;

    let movie_service = MovieService::new(Arc::new(source), cache, config.merge_policy.clone());
    let app = api::router(api::AppState::new(movie_service));

    let addr: SocketAddr = config.bind_address().parse()?;
    tracing::info!("🚀 Server listening on {}", addr);
    tracing::info!(
        "📦 Cache: enabled={}, ttl={}s, version={}",
        config.cache_enabled,
        config.cache_ttl.as_secs(),
        config.cache_version
    );
    tracing::info!(
        "🎬 Upstreams: page={}, api={}",
        config.piaofang_base_url,
        config.api_base_url
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
