//! `VoteLedger` over PostgreSQL.
//!
//! Casts run under a transaction-scoped advisory lock keyed on the voter, so
//! two casts by the same voter serialize and the second one sees the first
//! one's row when it re-checks the cooldown.
//!
//! Every vote write then locks the target's profile row before touching any
//! counter, so writes to one target serialize and always take the
//! `profile_ratings` and `profiles.rating` locks in the same order. Lock
//! order is voter advisory lock, then target row, then vote row.
//! Dropping a transaction without commit rolls it back.

use super::rows::{decode_category, decode_count, encode_category, CounterRow, TotalRow, VoteRow};
use super::{map_sqlx, voter_lock_key, PostgresStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{Category, ProfileId, StoreResult, Vote};
use sqlx::{Postgres, Transaction};
use std::collections::HashMap;
use ur_02_rating_engine::{Breakdown, ChangeOutcome, RecordOutcome, VoteLedger};
use uuid::Uuid;

const BUMP_COUNTER: &str = "INSERT INTO profile_ratings (to_oid, emoji, votes) VALUES ($1, $2, 1)
     ON CONFLICT (to_oid, emoji) DO UPDATE SET votes = profile_ratings.votes + 1";

/// Locks the target's profile row for the rest of the transaction and
/// returns its state code, or `None` when no such profile exists.
///
/// `NO KEY UPDATE` conflicts with itself but not with the `KEY SHARE` locks
/// taken by foreign-key checks on `votes`.
async fn lock_target(
    tx: &mut Transaction<'static, Postgres>,
    context: &'static str,
    target: ProfileId,
) -> StoreResult<Option<i16>> {
    sqlx::query_scalar::<_, i16>("SELECT state FROM profiles WHERE oid = $1 FOR NO KEY UPDATE")
        .bind(target.0)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| map_sqlx(context, e))
}

async fn bump_counter(
    tx: &mut Transaction<'static, Postgres>,
    target: ProfileId,
    category: Category,
) -> StoreResult<()> {
    sqlx::query(BUMP_COUNTER)
        .bind(target.0)
        .bind(encode_category(category))
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx("bump_counter", e))?;
    Ok(())
}

#[async_trait]
impl VoteLedger for PostgresStore {
    async fn find_vote(&self, voter: ProfileId, target: ProfileId) -> StoreResult<Option<Vote>> {
        let row = sqlx::query_as::<_, VoteRow>(
            "SELECT from_oid, to_oid, emoji, voted_at FROM votes
             WHERE from_oid = $1 AND to_oid = $2",
        )
        .bind(voter.0)
        .bind(target.0)
        .fetch_optional(&self.pool())
        .await
        .map_err(|e| map_sqlx("find_vote", e))?;

        row.map(|row| {
            Ok(Vote {
                voter: ProfileId(row.from_oid),
                target: ProfileId(row.to_oid),
                category: decode_category(row.emoji)?,
                voted_at: row.voted_at,
            })
        })
        .transpose()
    }

    async fn last_voted_at(&self, voter: ProfileId) -> StoreResult<Option<DateTime<Utc>>> {
        sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            "SELECT MAX(voted_at) FROM votes WHERE from_oid = $1",
        )
        .bind(voter.0)
        .fetch_one(&self.pool())
        .await
        .map_err(|e| map_sqlx("last_voted_at", e))
    }

    async fn record_vote(
        &self,
        vote: &Vote,
        cooldown_cutoff: DateTime<Utc>,
    ) -> StoreResult<RecordOutcome> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| map_sqlx("record_vote", e))?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(voter_lock_key(vote.voter))
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx("record_vote", e))?;

        let target_state = lock_target(&mut tx, "record_vote", vote.target).await?;
        if matches!(target_state, None | Some(-1)) {
            return Ok(RecordOutcome::UnknownTarget);
        }

        let last = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            "SELECT MAX(voted_at) FROM votes WHERE from_oid = $1",
        )
        .bind(vote.voter.0)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx("record_vote", e))?;
        if let Some(last_voted_at) = last {
            if last_voted_at > cooldown_cutoff {
                return Ok(RecordOutcome::CoolingDown { last_voted_at });
            }
        }

        let inserted = sqlx::query(
            "INSERT INTO votes (from_oid, to_oid, emoji, voted_at) VALUES ($1, $2, $3, $4)
             ON CONFLICT (from_oid, to_oid) DO NOTHING",
        )
        .bind(vote.voter.0)
        .bind(vote.target.0)
        .bind(encode_category(vote.category))
        .bind(vote.voted_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx("record_vote", e))?;
        if inserted.rows_affected() == 0 {
            return Ok(RecordOutcome::Duplicate);
        }

        bump_counter(&mut tx, vote.target, vote.category).await?;
        sqlx::query("UPDATE profiles SET rating = rating + 1 WHERE oid = $1")
            .bind(vote.target.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx("record_vote", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx("record_vote", e))?;
        Ok(RecordOutcome::Recorded)
    }

    async fn change_vote(
        &self,
        voter: ProfileId,
        target: ProfileId,
        category: Category,
        voted_at: DateTime<Utc>,
    ) -> StoreResult<ChangeOutcome> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| map_sqlx("change_vote", e))?;

        if lock_target(&mut tx, "change_vote", target).await?.is_none() {
            return Ok(ChangeOutcome::Missing);
        }

        let current = sqlx::query_scalar::<_, i16>(
            "SELECT emoji FROM votes WHERE from_oid = $1 AND to_oid = $2 FOR UPDATE",
        )
        .bind(voter.0)
        .bind(target.0)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx("change_vote", e))?;
        let Some(current) = current else {
            return Ok(ChangeOutcome::Missing);
        };
        let previous = decode_category(current)?;
        if previous == category {
            return Ok(ChangeOutcome::Unchanged);
        }

        sqlx::query(
            "UPDATE votes SET emoji = $3, voted_at = $4 WHERE from_oid = $1 AND to_oid = $2",
        )
        .bind(voter.0)
        .bind(target.0)
        .bind(encode_category(category))
        .bind(voted_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx("change_vote", e))?;

        sqlx::query(
            "UPDATE profile_ratings SET votes = votes - 1
             WHERE to_oid = $1 AND emoji = $2 AND votes > 0",
        )
        .bind(target.0)
        .bind(encode_category(previous))
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx("change_vote", e))?;
        bump_counter(&mut tx, target, category).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx("change_vote", e))?;
        Ok(ChangeOutcome::Changed { previous })
    }

    async fn category_counts(&self, target: ProfileId) -> StoreResult<Breakdown> {
        let rows = sqlx::query_as::<_, CounterRow>(
            "SELECT emoji, votes FROM profile_ratings WHERE to_oid = $1",
        )
        .bind(target.0)
        .fetch_all(&self.pool())
        .await
        .map_err(|e| map_sqlx("category_counts", e))?;

        let mut counts = Vec::with_capacity(rows.len());
        for row in rows {
            counts.push((decode_category(row.emoji)?, decode_count(row.votes)?));
        }
        Ok(Breakdown::from_counts(counts))
    }

    async fn totals_for(&self, targets: &[ProfileId]) -> StoreResult<HashMap<ProfileId, u64>> {
        if targets.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<Uuid> = targets.iter().map(|id| id.0).collect();
        let rows = sqlx::query_as::<_, TotalRow>(
            "SELECT oid, rating FROM profiles WHERE oid = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool())
        .await
        .map_err(|e| map_sqlx("totals_for", e))?;

        rows.into_iter()
            .map(|row| Ok((ProfileId(row.oid), decode_count(row.rating)?)))
            .collect()
    }
}
