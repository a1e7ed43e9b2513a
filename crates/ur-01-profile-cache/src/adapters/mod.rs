//! # Adapters Layer - Cache Subsystem
//!
//! - `memory`: process-local cache with lazy expiry
//! - `redis`: Redis-backed cache (feature = "redis")

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use memory::InMemoryCache;
#[cfg(feature = "redis")]
pub use self::redis::RedisCache;
