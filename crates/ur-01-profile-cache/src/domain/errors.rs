//! Cache error types.

use shared_types::BoxError;
use thiserror::Error;

/// Errors raised by the cache layer.
///
/// A plain miss is not an error; see `CacheLookup::Miss`.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backend could not be reached or rejected the command.
    #[error("cache backend failed during {op}")]
    Backend {
        op: &'static str,
        #[source]
        source: BoxError,
    },

    /// A stored entry could not be decoded into the requested type.
    #[error("cached entry under {key} could not be decoded")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized for storage.
    #[error("value could not be encoded for caching")]
    Encode(#[source] serde_json::Error),
}

impl CacheError {
    pub fn backend(op: &'static str, source: impl Into<BoxError>) -> Self {
        CacheError::Backend {
            op,
            source: source.into(),
        }
    }
}
