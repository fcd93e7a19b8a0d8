use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::time::Duration;
use tracing::{debug, error, info};

use super::{CacheError, ResponseCache};

/// Redis-backed cache.
///
/// `ConnectionManager` is cheap to clone and reconnects on its own, so each
/// operation clones it instead of locking a shared connection.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        // Do not log redis_url, it may carry a password
        let client = Client::open(redis_url).map_err(|e| {
            error!(error = %e, "Failed to open Redis client");
            e
        })?;

        let connection = ConnectionManager::new(client).await.map_err(|e| {
            error!(error = %e, "Failed to connect to Redis");
            e
        })?;

        info!("Connected to Redis cache");
        Ok(Self { connection })
    }
}

#[async_trait]
impl ResponseCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        debug!(key, hit = value.is_some(), "cache lookup");
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1)).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.connection.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.connection.clone();
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_malformed_url() {
        let result = RedisCache::connect("not-a-redis-url").await;
        assert!(matches!(result, Err(CacheError::Redis(_))));
    }

    #[tokio::test]
    #[ignore = "requires REDIS_URL"]
    async fn round_trip_against_live_redis() {
        let url = std::env::var("REDIS_URL").expect("REDIS_URL must be set");
        let cache = RedisCache::connect(&url).await.unwrap();
        cache.ping().await.unwrap();

        let key = format!("fazenda::test-{}", chrono::Utc::now().timestamp_micros());
        cache.set(&key, "{\"id\":1}".to_string(), Duration::from_secs(30)).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some("{\"id\":1}"));

        cache.delete(&key).await.unwrap();
        assert!(cache.get(&key).await.unwrap().is_none());
    }
}
