//! # Profile Store (ur-04)
//!
//! **Subsystem ID:** 4
//!
//! ## Purpose
//!
//! Owns canonical profile state and the live votes with their per-category
//! counters. Implements every store port of the workspace:
//!
//! - `AccountStore` (this crate): profile writes, credentials, session liveness
//! - `ProfileDirectory` (ur-03): profile reads and counts
//! - `VoteLedger` (ur-02): vote rows and counters
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | 1 | Vote row, category counter and profile total change in one unit | `record_vote()`, `change_vote()` in each adapter |
//! | 2 | One live vote per (voter, target) | primary key on `votes`; map key in memory |
//! | 3 | Cooldown re-checked under a per-voter lock | advisory lock (PostgreSQL), store mutex (memory) |
//! | 4 | Nicknames are unique | unique constraint; nickname index in memory |
//! | 5 | Deleted profiles never appear in lists or counts | list/count queries |
//! | 6 | Lost store connections are retried a bounded number of times | `watchdog.rs` |
//! | 7 | Vote writes to one target serialize | target row lock `FOR NO KEY UPDATE` (PostgreSQL), store mutex (memory) |
//!
//! ## Module Structure
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  adapters/memory.rs   - InMemoryStore (single mutex)            │
//! │  adapters/postgres/   - PostgresStore (feature = "postgres")    │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↓ implements ↓
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/account.rs - AccountStore                                │
//! │  ur-03 ProfileDirectory, ur-02 VoteLedger                       │
//! └─────────────────────────────────────────────────────────────────┘
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  watchdog.rs - MonitoredConnection, ConnectionWatchdog          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod ports;
pub mod watchdog;

pub use adapters::InMemoryStore;
#[cfg(feature = "postgres")]
pub use adapters::{PostgresConfig, PostgresStore};
pub use ports::AccountStore;
pub use watchdog::{ConnectionWatchdog, MonitoredConnection, WatchdogConfig, WatchdogError};
