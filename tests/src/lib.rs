//! # User-Rating Test Suite
//!
//! Cross-subsystem flows wired the way the service runtime wires them, over
//! the in-memory store and cache.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs      # profile seeding, failing backends
//!     ├── rating_flows.rs  # engine + store, concurrent casts
//!     └── read_flows.rs    # reader + engine + cache, invalidation
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ur-tests
//! cargo test -p ur-tests integration::rating_flows::
//! ```

pub mod integration;
