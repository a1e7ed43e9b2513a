//! Rating Service - vote legality and aggregation
//!
//! Pre-checks (existing vote, cooldown) give cheap early rejections; the
//! ledger repeats them inside its write transaction and its outcome wins.

use crate::domain::{Breakdown, RatingError, RatingPolicy, VoteReceipt};
use crate::ports::inbound::RatingApi;
use crate::ports::outbound::{ChangeOutcome, RecordOutcome, VoteLedger};
use async_trait::async_trait;
use shared_types::{Category, Clock, ProfileId, Vote};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Rating engine over a `VoteLedger`.
pub struct RatingEngine {
    ledger: Arc<dyn VoteLedger>,
    clock: Arc<dyn Clock>,
    policy: RatingPolicy,
}

impl RatingEngine {
    pub fn new(ledger: Arc<dyn VoteLedger>, clock: Arc<dyn Clock>, policy: RatingPolicy) -> Self {
        Self {
            ledger,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> &RatingPolicy {
        &self.policy
    }

    /// Validation that needs no store access.
    fn check_cast(
        voter: ProfileId,
        target: ProfileId,
        category: i64,
    ) -> Result<Category, RatingError> {
        if voter == target {
            return Err(RatingError::SelfVote);
        }
        parse_category(category)
    }
}

fn parse_category(raw: i64) -> Result<Category, RatingError> {
    i32::try_from(raw)
        .ok()
        .and_then(|value| Category::try_from(value).ok())
        .ok_or(RatingError::InvalidCategory(raw))
}

#[async_trait]
impl RatingApi for RatingEngine {
    async fn cast_vote(
        &self,
        voter: ProfileId,
        target: ProfileId,
        category: i64,
    ) -> Result<VoteReceipt, RatingError> {
        let category = Self::check_cast(voter, target, category)?;
        let now = self.clock.now();

        if self.ledger.find_vote(voter, target).await?.is_some() {
            debug!("[ur-02] {} already voted for {}", voter, target);
            return Err(RatingError::AlreadyVoted);
        }

        if let Some(last) = self.ledger.last_voted_at(voter).await? {
            if self.policy.is_cooling_down(last, now) {
                debug!("[ur-02] {} is cooling down since {}", voter, last);
                return Err(RatingError::RateLimited {
                    retry_at: self.policy.retry_at(last),
                });
            }
        }

        let vote = Vote {
            voter,
            target,
            category,
            voted_at: now,
        };

        match self
            .ledger
            .record_vote(&vote, self.policy.cutoff(now))
            .await?
        {
            RecordOutcome::Recorded => {
                info!(
                    voter = %voter,
                    target = %target,
                    category = category.value(),
                    "[ur-02] vote recorded"
                );
                Ok(VoteReceipt {
                    voter,
                    target,
                    category,
                    previous: None,
                    voted_at: now,
                })
            }
            RecordOutcome::Duplicate => {
                warn!("[ur-02] concurrent duplicate vote {} -> {}", voter, target);
                Err(RatingError::AlreadyVoted)
            }
            RecordOutcome::CoolingDown { last_voted_at } => Err(RatingError::RateLimited {
                retry_at: self.policy.retry_at(last_voted_at),
            }),
            RecordOutcome::UnknownTarget => Err(RatingError::UnknownTarget),
        }
    }

    async fn change_vote(
        &self,
        voter: ProfileId,
        target: ProfileId,
        category: i64,
    ) -> Result<VoteReceipt, RatingError> {
        let category = parse_category(category)?;
        let now = self.clock.now();

        let existing = self
            .ledger
            .find_vote(voter, target)
            .await?
            .ok_or(RatingError::NotFound)?;
        if existing.category == category {
            return Err(RatingError::NoOp);
        }

        match self
            .ledger
            .change_vote(voter, target, category, now)
            .await?
        {
            ChangeOutcome::Changed { previous } => {
                info!(
                    voter = %voter,
                    target = %target,
                    from = previous.value(),
                    to = category.value(),
                    "[ur-02] vote changed"
                );
                Ok(VoteReceipt {
                    voter,
                    target,
                    category,
                    previous: Some(previous),
                    voted_at: now,
                })
            }
            ChangeOutcome::Missing => Err(RatingError::NotFound),
            ChangeOutcome::Unchanged => Err(RatingError::NoOp),
        }
    }

    async fn breakdown(&self, target: ProfileId) -> Result<Breakdown, RatingError> {
        Ok(self.ledger.category_counts(target).await?)
    }

    async fn totals_for_many(
        &self,
        targets: &[ProfileId],
    ) -> Result<HashMap<ProfileId, u64>, RatingError> {
        if targets.is_empty() {
            return Ok(HashMap::new());
        }

        let mut unique = targets.to_vec();
        unique.sort();
        unique.dedup();

        let found = self.ledger.totals_for(&unique).await?;
        Ok(unique
            .into_iter()
            .map(|id| (id, found.get(&id).copied().unwrap_or(0)))
            .collect())
    }
}
