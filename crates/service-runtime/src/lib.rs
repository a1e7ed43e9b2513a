//! # User Rating Service Runtime
//!
//! Builds and supervises the whole service.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging from `LOG_LEVEL`
//! 2. Load configuration from the environment and validate it
//! 3. Open the store (PostgreSQL when `DATABASE_URL` is set, else in-memory)
//! 4. Open the cache (Redis when `REDIS_ADDR` is set, else in-memory)
//! 5. Wire rating engine, profile reader and API gateway
//! 6. Start the HTTP listener and, for PostgreSQL, the connection watchdog
//!
//! ## Shutdown
//!
//! Ctrl+C or SIGTERM flips the shared `watch` channel. The listener drains,
//! the watchdog stops, and the pool is closed. An exhausted watchdog takes
//! the same path and the process exits non-zero.

pub mod config;
pub mod runtime;
pub mod telemetry;

pub use config::{ConfigError, ServiceConfig};
pub use runtime::ServiceRuntime;
pub use telemetry::init_tracing;
