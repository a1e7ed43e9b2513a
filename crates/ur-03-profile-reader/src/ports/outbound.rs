//! # Outbound Ports
//!
//! Read access to the canonical profile store.

use async_trait::async_trait;
use shared_types::{Profile, ProfileId, StoreResult};

/// Read side of the transactional profile store.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// The profile with `id`; `StoreError::NotFound` if absent.
    async fn get_profile(&self, id: ProfileId) -> StoreResult<Profile>;

    /// Non-deleted profiles ordered by creation time then id.
    async fn list_profiles(&self, limit: u32, offset: u64) -> StoreResult<Vec<Profile>>;

    /// Number of non-deleted profiles.
    async fn count_profiles(&self) -> StoreResult<u64>;
}
