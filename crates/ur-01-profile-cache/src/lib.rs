//! # Cache-Aside Store (ur-01)
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! Holds serialized profile snapshots and paginated list results with a fixed
//! time-to-live. The cache has no notion of correctness, only of a staleness
//! window: it is never authoritative and readers must tolerate stale entries
//! for up to the TTL.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | 1 | Miss is distinguishable from a decode failure | `service.rs` - `CacheLookup` vs `CacheError::Decode` |
//! | 2 | One canonical key derivation per query shape | `domain/key.rs` - `CacheKey` constructors |
//! | 3 | Every write carries the configured TTL | `service.rs` - `CacheAside::store()` |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  adapters/ - InMemoryCache, RedisCache (feature = "redis")      │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/outbound.rs - CacheBackend trait (raw strings + TTL)     │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  service.rs   - CacheAside (typed JSON get/set/invalidate)      │
//! │  domain/      - CacheKey, CacheError                            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryCache;
#[cfg(feature = "redis")]
pub use adapters::RedisCache;
pub use domain::{CacheError, CacheKey};
pub use ports::CacheBackend;
pub use service::{CacheAside, CacheLookup};
