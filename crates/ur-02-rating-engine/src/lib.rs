//! # Rating Engine (ur-02)
//!
//! **Subsystem ID:** 2
//!
//! ## Purpose
//!
//! Decides whether a vote is legal, enforces the per-voter cooldown, and
//! turns the per-category counters kept by the vote ledger into the
//! breakdowns and totals the read side shows.
//!
//! The engine is stateless between calls; all shared state lives behind the
//! `VoteLedger` port.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | 1 | A voter never rates themselves | `service.rs` - `check_cast()` |
//! | 2 | Category is within 1..=5, checked before any store access | `service.rs` - `parse_category()` |
//! | 3 | At most one live vote per (voter, target) | `VoteLedger::record_vote()` (authoritative), pre-check in `cast_vote()` |
//! | 4 | One vote per voter per cooldown window, across all targets | `RatingPolicy`, re-checked by the ledger |
//! | 5 | Vote row and counters change together or not at all | `VoteLedger` implementations (single transaction) |
//! | 6 | A breakdown lists every category, zeros included | `domain/breakdown.rs` |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - RatingApi (cast, change, breakdown, totals)│
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↓ implemented by ↓
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  service.rs - RatingEngine                                      │
//! │  domain/    - Breakdown, RatingPolicy, RatingError, VoteReceipt │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↓ uses ↓
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/outbound.rs - VoteLedger, RecordOutcome, ChangeOutcome   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::inbound::RatingApi;
pub use ports::outbound::{ChangeOutcome, RecordOutcome, VoteLedger};
pub use service::RatingEngine;
