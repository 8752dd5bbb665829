use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;

use crate::db::SimilarityStore;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    ItemSimilarity,
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::ItemSimilarity => write!(f, "simmatrix:items"),
        }
    }
}

/// Creates a Redis client for caching
///
/// Establishes a connection to Redis for fast data caching.
/// Uses connection pooling via the connection-manager feature.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Similarity artifact stored under a single Redis key
///
/// The value has no TTL; staleness is decided by the artifact header. A `SET`
/// replaces the value atomically.
#[derive(Clone)]
pub struct RedisSimilarityStore {
    redis_client: Client,
    key: CacheKey,
}

impl RedisSimilarityStore {
    pub fn new(redis_client: Client) -> Self {
        Self {
            redis_client,
            key: CacheKey::ItemSimilarity,
        }
    }
}

#[async_trait::async_trait]
impl SimilarityStore for RedisSimilarityStore {
    async fn load(&self) -> AppResult<Option<Vec<u8>>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<Vec<u8>> = conn.get(self.key.to_string()).await.map_err(|e| {
            tracing::warn!(error = %e, "Redis get failed");
            e
        })?;
        Ok(cached)
    }

    async fn save(&self, bytes: &[u8]) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(self.key.to_string(), bytes).await.map_err(|e| {
            tracing::warn!(error = %e, "Redis set failed");
            e
        })?;

        tracing::debug!(key = %self.key, bytes = bytes.len(), "Similarity artifact cached");
        Ok(())
    }

    async fn remove(&self) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(self.key.to_string()).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
