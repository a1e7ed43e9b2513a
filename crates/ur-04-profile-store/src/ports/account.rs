//! # Account Port
//!
//! Profile writes, credential access and session liveness.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{NewProfile, ProfileId, ProfileUpdate, SessionSubject, State, StoreResult};

/// Write side of the transactional profile store.
///
/// Every mutation of a deleted profile reports `StoreError::NotFound`.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Registers a profile. A taken nickname is `StoreError::Conflict`.
    async fn create_profile(&self, new: NewProfile) -> StoreResult<ProfileId>;

    /// Replaces the editable fields. A taken nickname is `StoreError::Conflict`.
    async fn update_profile(
        &self,
        id: ProfileId,
        update: ProfileUpdate,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()>;

    async fn update_password(
        &self,
        id: ProfileId,
        password_hash: String,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()>;

    /// Credential hash of the non-deleted profile named `nickname`.
    async fn password_hash(&self, nickname: &str) -> StoreResult<String>;

    /// Identity facts of the non-deleted profile named `nickname`.
    async fn session_subject(&self, nickname: &str) -> StoreResult<SessionSubject>;

    /// Current lifecycle state, checked on every authenticated request.
    async fn state_of(&self, id: ProfileId) -> StoreResult<State>;

    /// Moves a non-deleted profile to `state`.
    async fn set_state(
        &self,
        id: ProfileId,
        state: State,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()>;

    /// Soft delete: the profile moves to `State::Deleted`.
    async fn delete_profile(&self, id: ProfileId, updated_at: DateTime<Utc>) -> StoreResult<()>;
}
