//! Optional response cache for single-farm lookups.
//!
//! Values are serialized JSON strings stored under `fazenda::{id}` with a
//! fixed TTL. Entries leave the cache when the TTL expires or when the farm
//! is updated.

pub mod memory;
pub mod redis;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub use self::memory::InMemoryCache;
pub use self::redis::RedisCache;

const FAZENDA_KEY_PREFIX: &str = "fazenda::";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key/value store with per-entry expiry.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;
}

pub fn fazenda_key(id: i64) -> String {
    format!("{}{}", FAZENDA_KEY_PREFIX, id)
}
