//! # Cache-Aside Service
//!
//! Typed JSON layer over a raw `CacheBackend`. Callers read through
//! `lookup()`, fall back to the source of truth on `Miss`, then `store()`.

use crate::domain::{CacheError, CacheKey};
use crate::ports::CacheBackend;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default time-to-live of cached entries (60 seconds).
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<T> {
    /// The key was present and decoded.
    Hit(T),
    /// The key is absent or expired.
    Miss,
}

impl<T> CacheLookup<T> {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    /// Converts into an `Option`, discarding the hit/miss distinction.
    pub fn into_option(self) -> Option<T> {
        match self {
            CacheLookup::Hit(value) => Some(value),
            CacheLookup::Miss => None,
        }
    }
}

/// Cache-aside store with a fixed TTL.
#[derive(Clone)]
pub struct CacheAside {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
}

impl CacheAside {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Looks up `key` and decodes it as `T`.
    ///
    /// An undecodable entry is reported as `CacheError::Decode`, never as a miss.
    pub async fn lookup<T: DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> Result<CacheLookup<T>, CacheError> {
        let Some(raw) = self.backend.get(key).await? else {
            debug!("[ur-01] miss {}", key);
            return Ok(CacheLookup::Miss);
        };

        let value = serde_json::from_str(&raw).map_err(|source| CacheError::Decode {
            key: key.to_string(),
            source,
        })?;
        debug!("[ur-01] hit {}", key);
        Ok(CacheLookup::Hit(value))
    }

    /// Serializes `value` and stores it under `key` with the configured TTL.
    pub async fn store<T: Serialize + ?Sized>(
        &self,
        key: &CacheKey,
        value: &T,
    ) -> Result<(), CacheError> {
        let raw = serde_json::to_string(value).map_err(CacheError::Encode)?;
        self.backend.set(key, raw, self.ttl).await
    }

    /// Removes `key`.
    pub async fn invalidate(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.backend.remove(key).await
    }
}
