//! # PostgreSQL Profile Store
//!
//! Production implementation of `AccountStore`, `ProfileDirectory` and
//! `VoteLedger` over a `sqlx` connection pool. The pool sits behind a lock so
//! the watchdog can swap in a fresh pool after a reconnect; queries clone the
//! current pool handle and never hold the lock across an await.
//!
//! The expected schema ships as `sql/schema.sql`.

mod account;
mod directory;
mod ledger;
mod rows;

use crate::watchdog::MonitoredConnection;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{StoreError, StoreResult};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

/// SQLSTATE of a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Connection settings.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// PostgreSQL-backed store.
pub struct PostgresStore {
    config: PostgresConfig,
    pool: RwLock<PgPool>,
}

impl PostgresStore {
    /// Opens a pool and verifies it with one round trip.
    pub async fn connect(config: PostgresConfig) -> StoreResult<Self> {
        let pool = open_pool(&config).await?;
        info!(
            max_connections = config.max_connections,
            "[ur-04] connected to PostgreSQL"
        );
        Ok(Self {
            config,
            pool: RwLock::new(pool),
        })
    }

    /// Current pool handle.
    pub(crate) fn pool(&self) -> PgPool {
        self.pool.read().clone()
    }

    /// Closes the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool().close().await;
        info!("[ur-04] PostgreSQL pool closed");
    }
}

async fn open_pool(config: &PostgresConfig) -> StoreResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await
        .map_err(|e| StoreError::unavailable("connect", e))
}

#[async_trait]
impl MonitoredConnection for PostgresStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool())
            .await
            .map(|_| ())
            .map_err(|e| map_sqlx("ping", e))
    }

    async fn reconnect(&self) -> StoreResult<()> {
        let fresh = open_pool(&self.config).await?;
        let stale = std::mem::replace(&mut *self.pool.write(), fresh);
        stale.close().await;
        Ok(())
    }
}

/// Classifies a driver error. "No rows" and unique violations are outcomes;
/// everything else means the store is unavailable.
pub(crate) fn map_sqlx(context: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            StoreError::Conflict(db.constraint().unwrap_or("unique").to_string())
        }
        other => StoreError::unavailable(context, other),
    }
}

/// Lock key serializing one voter's casts.
pub(crate) fn voter_lock_key(voter: shared_types::ProfileId) -> i64 {
    let (high, low) = voter.as_uuid().as_u64_pair();
    (high ^ low) as i64
}
