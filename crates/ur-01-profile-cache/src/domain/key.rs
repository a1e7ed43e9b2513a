//! Cache key derivation.
//!
//! Keys are a pure function of the query shape. Readers and writers must go
//! through the same constructor, otherwise entries are written under one key
//! and looked up under another and the cache silently never hits.

use shared_types::ProfileId;
use std::fmt;

/// A derived cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key of a single profile snapshot: the raw identifier string.
    pub fn profile(id: ProfileId) -> Self {
        Self(id.to_string())
    }

    /// Key of one list page, derived from the page size and row offset.
    pub fn page(page_size: u32, offset: u64) -> Self {
        Self(format!("pageSize:{},offset:{}", page_size, offset))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
