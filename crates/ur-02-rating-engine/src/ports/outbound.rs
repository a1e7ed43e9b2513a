//! # Outbound Ports
//!
//! Vote storage dependency of the Rating subsystem.

use crate::domain::Breakdown;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{Category, ProfileId, StoreResult, Vote};
use std::collections::HashMap;

/// Outcome of `VoteLedger::record_vote`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Vote row and counters written.
    Recorded,
    /// A live vote for the pair already exists; nothing written.
    Duplicate,
    /// The voter voted after the cutoff; nothing written.
    CoolingDown { last_voted_at: DateTime<Utc> },
    /// The target does not exist or is deleted; nothing written.
    UnknownTarget,
}

/// Outcome of `VoteLedger::change_vote`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Vote updated; counters moved from `previous` to the new category.
    Changed { previous: Category },
    /// No live vote for the pair.
    Missing,
    /// The live vote already has the requested category.
    Unchanged,
}

/// Store of live votes and the per-category counters derived from them.
///
/// `record_vote` and `change_vote` are the authoritative legality checks:
/// each runs its checks and writes inside one atomic unit, so a concurrent
/// duplicate or a vote inside the cooldown is reported as an outcome rather
/// than written.
#[async_trait]
pub trait VoteLedger: Send + Sync {
    /// The live vote for `(voter, target)`, if any.
    async fn find_vote(&self, voter: ProfileId, target: ProfileId) -> StoreResult<Option<Vote>>;

    /// Most recent `voted_at` over every live vote cast by `voter`.
    async fn last_voted_at(&self, voter: ProfileId) -> StoreResult<Option<DateTime<Utc>>>;

    /// Inserts `vote` and bumps the target's counters, unless the pair
    /// already has a vote or the voter's last vote is after `cooldown_cutoff`.
    async fn record_vote(
        &self,
        vote: &Vote,
        cooldown_cutoff: DateTime<Utc>,
    ) -> StoreResult<RecordOutcome>;

    /// Sets the category and timestamp of the live vote and moves one count
    /// from the old category to the new one.
    async fn change_vote(
        &self,
        voter: ProfileId,
        target: ProfileId,
        category: Category,
        voted_at: DateTime<Utc>,
    ) -> StoreResult<ChangeOutcome>;

    /// Per-category counts for `target`.
    async fn category_counts(&self, target: ProfileId) -> StoreResult<Breakdown>;

    /// Totals for `targets`. Targets without votes may be omitted.
    async fn totals_for(&self, targets: &[ProfileId]) -> StoreResult<HashMap<ProfileId, u64>>;
}
