//! Read error types.

use shared_types::{BoxError, StoreError};
use thiserror::Error;
use ur_02_rating_engine::RatingError;

/// Errors returned by profile reads.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The profile does not exist or is deleted.
    #[error("profile not found")]
    NotFound,

    /// A backing store failed.
    #[error("profile store unavailable")]
    StoreUnavailable(#[source] BoxError),
}

impl From<StoreError> for ReadError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ReadError::NotFound,
            other => ReadError::StoreUnavailable(Box::new(other)),
        }
    }
}

impl From<RatingError> for ReadError {
    fn from(err: RatingError) -> Self {
        ReadError::StoreUnavailable(Box::new(err))
    }
}
