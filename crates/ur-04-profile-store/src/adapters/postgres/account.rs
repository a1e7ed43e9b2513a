//! `AccountStore` over PostgreSQL.

use super::rows::{decode_state, SubjectRow};
use super::{map_sqlx, PostgresStore};
use crate::ports::AccountStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{
    NewProfile, ProfileId, ProfileUpdate, SessionSubject, State, StoreError, StoreResult,
};
use sqlx::postgres::PgQueryResult;

/// An update that matched no live row means the profile is gone.
fn require_row(result: PgQueryResult) -> StoreResult<()> {
    if result.rows_affected() == 0 {
        Err(StoreError::NotFound)
    } else {
        Ok(())
    }
}

#[async_trait]
impl AccountStore for PostgresStore {
    async fn create_profile(&self, new: NewProfile) -> StoreResult<ProfileId> {
        let p = &new.profile;
        sqlx::query(
            "INSERT INTO profiles
                (oid, nickname, first_name, last_name, password_hash,
                 created_at, updated_at, state, user_role, rating)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 0)",
        )
        .bind(p.id.0)
        .bind(&p.nickname)
        .bind(&p.first_name)
        .bind(&p.last_name)
        .bind(&new.password_hash)
        .bind(p.created_at)
        .bind(p.updated_at)
        .bind(p.state.code())
        .bind(p.role.code())
        .execute(&self.pool())
        .await
        .map_err(|e| map_sqlx("create_profile", e))?;
        Ok(p.id)
    }

    async fn update_profile(
        &self,
        id: ProfileId,
        update: ProfileUpdate,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE profiles
             SET nickname = $2, first_name = $3, last_name = $4, updated_at = $5
             WHERE oid = $1 AND state <> -1",
        )
        .bind(id.0)
        .bind(&update.nickname)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(updated_at)
        .execute(&self.pool())
        .await
        .map_err(|e| map_sqlx("update_profile", e))?;
        require_row(result)
    }

    async fn update_password(
        &self,
        id: ProfileId,
        password_hash: String,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE profiles SET password_hash = $2, updated_at = $3
             WHERE oid = $1 AND state <> -1",
        )
        .bind(id.0)
        .bind(&password_hash)
        .bind(updated_at)
        .execute(&self.pool())
        .await
        .map_err(|e| map_sqlx("update_password", e))?;
        require_row(result)
    }

    async fn password_hash(&self, nickname: &str) -> StoreResult<String> {
        sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM profiles WHERE nickname = $1 AND state <> -1",
        )
        .bind(nickname)
        .fetch_optional(&self.pool())
        .await
        .map_err(|e| map_sqlx("password_hash", e))?
        .ok_or(StoreError::NotFound)
    }

    async fn session_subject(&self, nickname: &str) -> StoreResult<SessionSubject> {
        let row = sqlx::query_as::<_, SubjectRow>(
            "SELECT oid, nickname, user_role, state FROM profiles
             WHERE nickname = $1 AND state <> -1",
        )
        .bind(nickname)
        .fetch_optional(&self.pool())
        .await
        .map_err(|e| map_sqlx("session_subject", e))?
        .ok_or(StoreError::NotFound)?;
        SessionSubject::try_from(row)
    }

    async fn state_of(&self, id: ProfileId) -> StoreResult<State> {
        let code = sqlx::query_scalar::<_, i16>("SELECT state FROM profiles WHERE oid = $1")
            .bind(id.0)
            .fetch_optional(&self.pool())
            .await
            .map_err(|e| map_sqlx("state_of", e))?
            .ok_or(StoreError::NotFound)?;
        decode_state(code)
    }

    async fn set_state(
        &self,
        id: ProfileId,
        state: State,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE profiles SET state = $2, updated_at = $3 WHERE oid = $1 AND state <> -1",
        )
        .bind(id.0)
        .bind(state.code())
        .bind(updated_at)
        .execute(&self.pool())
        .await
        .map_err(|e| map_sqlx("set_state", e))?;
        require_row(result)
    }

    async fn delete_profile(&self, id: ProfileId, updated_at: DateTime<Utc>) -> StoreResult<()> {
        self.set_state(id, State::Deleted, updated_at).await
    }
}
