//! # Adapters Layer - Profile Store
//!
//! - `memory`: single-process store, used when no database is configured
//! - `postgres`: PostgreSQL store (feature = "postgres")

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::InMemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::{PostgresConfig, PostgresStore};
