//! # Profile Read Orchestrator (ur-03)
//!
//! **Subsystem ID:** 3
//!
//! ## Purpose
//!
//! Answers single-profile and profile-list queries through the cache. A hit
//! returns immediately; a miss reads the profile store and the rating engine,
//! composes the public view, and populates the cache.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | 1 | Credential hashes never reach a read view | `Profile` carries none; `ProfileSnapshot::compose` |
//! | 2 | Hit and miss paths return the same snapshot | cache holds the composed snapshot |
//! | 3 | Rows without votes keep a zero rating, never dropped | `service.rs` - `get_profile_list()` |
//! | 4 | Count scan only for a full page or a page beyond the first | `domain/pagination.rs` - `needs_total_count()` |
//! | 5 | Cache failures never fail a read | `service.rs` - lookups degrade to a miss |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  service.rs - ProfileReader                                     │
//! │  domain/    - PageRequest, ReaderConfig, ReadError              │
//! └─────────────────────────────────────────────────────────────────┘
//!              ↓ uses ↓                       ↓ uses ↓
//! ┌──────────────────────────────┐  ┌───────────────────────────────┐
//! │ ports/outbound.rs            │  │ ur-01 CacheAside              │
//! │   ProfileDirectory           │  │ ur-02 RatingApi               │
//! └──────────────────────────────┘  └───────────────────────────────┘
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::outbound::ProfileDirectory;
pub use service::ProfileReader;
