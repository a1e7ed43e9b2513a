//! Rating error types.

use chrono::{DateTime, Utc};
use shared_types::StoreError;
use thiserror::Error;

/// Errors returned by rating operations.
#[derive(Debug, Error)]
pub enum RatingError {
    /// Voter and target are the same profile.
    #[error("cannot vote for yourself")]
    SelfVote,

    /// Category outside 1..=5.
    #[error("invalid category {0}: expected a value from 1 to 5")]
    InvalidCategory(i64),

    /// The voter already has a live vote for this target.
    #[error("already voted for this profile")]
    AlreadyVoted,

    /// The voter is inside the cooldown window.
    #[error("vote rate limit reached, next vote allowed at {retry_at}")]
    RateLimited { retry_at: DateTime<Utc> },

    /// The target profile does not exist or is deleted.
    #[error("target profile not found")]
    UnknownTarget,

    /// No live vote exists to change.
    #[error("no vote to change")]
    NotFound,

    /// The change would not alter the vote.
    #[error("vote already has this category")]
    NoOp,

    /// The vote store failed; nothing was applied.
    #[error("vote store unavailable")]
    StoreUnavailable(#[source] StoreError),
}

/// Coarse classification used to pick a response class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before touching any store.
    Validation,
    /// Rejected after a read-only check.
    BusinessRule,
    /// The addressed vote or profile does not exist.
    NotFound,
    /// Backing store failure.
    Unavailable,
}

impl RatingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RatingError::SelfVote | RatingError::InvalidCategory(_) => ErrorKind::Validation,
            RatingError::AlreadyVoted | RatingError::RateLimited { .. } | RatingError::NoOp => {
                ErrorKind::BusinessRule
            }
            RatingError::UnknownTarget | RatingError::NotFound => ErrorKind::NotFound,
            RatingError::StoreUnavailable(_) => ErrorKind::Unavailable,
        }
    }
}

impl From<StoreError> for RatingError {
    fn from(err: StoreError) -> Self {
        RatingError::StoreUnavailable(err)
    }
}
