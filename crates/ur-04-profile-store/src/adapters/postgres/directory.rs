//! `ProfileDirectory` over PostgreSQL.

use super::rows::{ProfileRow, PROFILE_COLUMNS};
use super::{map_sqlx, PostgresStore};
use async_trait::async_trait;
use shared_types::{Profile, ProfileId, StoreError, StoreResult};
use ur_03_profile_reader::ProfileDirectory;

#[async_trait]
impl ProfileDirectory for PostgresStore {
    async fn get_profile(&self, id: ProfileId) -> StoreResult<Profile> {
        let sql = format!("SELECT {} FROM profiles WHERE oid = $1", PROFILE_COLUMNS);
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool())
            .await
            .map_err(|e| map_sqlx("get_profile", e))?
            .ok_or(StoreError::NotFound)?;
        Profile::try_from(row)
    }

    async fn list_profiles(&self, limit: u32, offset: u64) -> StoreResult<Vec<Profile>> {
        let sql = format!(
            "SELECT {} FROM profiles WHERE state <> -1
             ORDER BY created_at, oid LIMIT $1 OFFSET $2",
            PROFILE_COLUMNS
        );
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(i64::from(limit))
            .bind(offset)
            .fetch_all(&self.pool())
            .await
            .map_err(|e| map_sqlx("list_profiles", e))?;
        rows.into_iter().map(Profile::try_from).collect()
    }

    async fn count_profiles(&self) -> StoreResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles WHERE state <> -1")
            .fetch_one(&self.pool())
            .await
            .map_err(|e| map_sqlx("count_profiles", e))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
