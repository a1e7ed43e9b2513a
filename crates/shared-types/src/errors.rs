//! # Error Types
//!
//! Defines the store error shared by every port that talks to a backing store.

use thiserror::Error;

/// Boxed underlying cause of a store failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by store adapters.
///
/// `NotFound` is a normal control-flow outcome ("no rows"); callers match on
/// the variant, never on the message text.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("record not found")]
    NotFound,

    /// A uniqueness constraint rejected the write.
    #[error("conflicting record: {0}")]
    Conflict(String),

    /// The store could not be reached or the transaction was rolled back.
    #[error("{context}: store unavailable")]
    Unavailable {
        /// Operation that failed.
        context: &'static str,
        /// Underlying driver error.
        #[source]
        source: BoxError,
    },

    /// A persisted value could not be decoded into a domain type.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Wraps a driver error, keeping it as the source.
    pub fn unavailable(context: &'static str, source: impl Into<BoxError>) -> Self {
        StoreError::Unavailable {
            context,
            source: source.into(),
        }
    }

    /// True for the "no rows" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_unavailable_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = StoreError::unavailable("get_profile", io);
        assert_eq!(err.to_string(), "get_profile: store unavailable");
        assert_eq!(err.source().unwrap().to_string(), "refused");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_is_control_flow() {
        assert!(StoreError::NotFound.is_not_found());
    }
}
