//! # Domain Layer - Rating Subsystem
//!
//! - `breakdown`: per-category vote counts
//! - `policy`: cooldown rules
//! - `errors`: RatingError and its classification

pub mod breakdown;
pub mod errors;
pub mod policy;

pub use breakdown::*;
pub use errors::*;
pub use policy::*;

use chrono::{DateTime, Utc};
use shared_types::{Category, ProfileId};

/// Result of an accepted cast or change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteReceipt {
    pub voter: ProfileId,
    pub target: ProfileId,
    pub category: Category,
    /// Category replaced by a change; `None` for a first vote.
    pub previous: Option<Category>,
    pub voted_at: DateTime<Utc>,
}
