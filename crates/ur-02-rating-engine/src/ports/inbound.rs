//! # Inbound Ports
//!
//! API trait defining what the Rating subsystem can do.

use crate::domain::{Breakdown, RatingError, VoteReceipt};
use async_trait::async_trait;
use shared_types::ProfileId;
use std::collections::HashMap;

/// Rating API - inbound port.
///
/// Categories arrive as raw integers so that range validation happens here,
/// before any store is touched.
#[async_trait]
pub trait RatingApi: Send + Sync {
    /// Casts a first vote from `voter` to `target`.
    async fn cast_vote(
        &self,
        voter: ProfileId,
        target: ProfileId,
        category: i64,
    ) -> Result<VoteReceipt, RatingError>;

    /// Replaces the category of an existing vote.
    async fn change_vote(
        &self,
        voter: ProfileId,
        target: ProfileId,
        category: i64,
    ) -> Result<VoteReceipt, RatingError>;

    /// Per-category counts for one target, every category included.
    async fn breakdown(&self, target: ProfileId) -> Result<Breakdown, RatingError>;

    /// Total live votes per target. Every requested id is present in the
    /// result, with zero when it has no votes.
    async fn totals_for_many(
        &self,
        targets: &[ProfileId],
    ) -> Result<HashMap<ProfileId, u64>, RatingError>;
}
