use std::sync::Arc;

use cinematch::{
    config::{CacheBackend, Config},
    db::{self, FileSimilarityStore, PgDataSource, RedisSimilarityStore, SimilarityStore},
    routes::{create_router, AppState},
    services::{RecommendationService, SimilarityCache},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url)?;
    let source = Arc::new(PgDataSource::new(pool));

    let store: Arc<dyn SimilarityStore> = match config.cache_backend {
        CacheBackend::File => Arc::new(FileSimilarityStore::new(&config.similarity_cache_path)),
        CacheBackend::Redis => {
            let client = db::create_redis_client(&config.redis_url)?;
            Arc::new(RedisSimilarityStore::new(client))
        }
    };
    tracing::info!(backend = store.name(), "Item similarity store configured");

    let service = RecommendationService::new(source.clone(), source, SimilarityCache::new(store));
    let state = Arc::new(
        AppState::new(service).with_defaults(config.default_n, config.default_k),
    );

    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
