//! # Redis Cache Backend
//!
//! `CacheBackend` over a multiplexed `ConnectionManager`. The manager
//! reconnects on its own, so a dropped Redis only turns reads into errors
//! (which callers treat as misses) until it comes back.

use crate::domain::{CacheError, CacheKey};
use crate::ports::CacheBackend;
use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client};
use std::time::Duration;
use tracing::info;

/// Redis-backed cache.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Connects to `addr` (`host:port`) and selects database `db_index`.
    pub async fn connect(addr: &str, db_index: u32) -> Result<Self, CacheError> {
        let url = format!("redis://{}/{}", addr, db_index);
        let client = Client::open(url).map_err(|e| CacheError::backend("connect", e))?;

        let config = ConnectionManagerConfig::new().set_number_of_retries(1);
        let conn = client
            .get_connection_manager_with_config(config)
            .await
            .map_err(|e| CacheError::backend("connect", e))?;

        info!("[ur-01] connected to redis at {} (db {})", addr, db_index);
        Ok(Self { conn })
    }

    pub fn from_manager(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(key.as_str())
            .await
            .map_err(|e| CacheError::backend("get", e))
    }

    async fn set(&self, key: &CacheKey, value: String, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        // SETEX rejects a zero expiry.
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key.as_str(), value, seconds)
            .await
            .map_err(|e| CacheError::backend("set", e))
    }

    async fn remove(&self, key: &CacheKey) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key.as_str())
            .await
            .map_err(|e| CacheError::backend("remove", e))
    }
}
