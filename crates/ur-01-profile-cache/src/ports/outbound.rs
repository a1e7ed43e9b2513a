//! Outbound (Driven) ports for the Cache subsystem.

use crate::domain::{CacheError, CacheKey};
use async_trait::async_trait;
use std::time::Duration;

/// Abstract interface for an expiring string key/value store.
///
/// Production: `RedisCache`
/// Testing / single-process: `InMemoryCache`
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Gets the raw value under `key`; `Ok(None)` on a miss or expired entry.
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key`, expiring after `ttl`.
    async fn set(&self, key: &CacheKey, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &CacheKey) -> Result<(), CacheError>;
}
