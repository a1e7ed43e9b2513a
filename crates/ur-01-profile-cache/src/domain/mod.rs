//! # Domain Layer - Cache Subsystem
//!
//! - `key`: deterministic key derivation per query shape
//! - `errors`: CacheError enumeration

pub mod errors;
pub mod key;

pub use errors::*;
pub use key::*;
