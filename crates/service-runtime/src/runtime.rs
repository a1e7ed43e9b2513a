//! Service wiring and supervision.

use crate::config::{CacheConfig, DatabaseConfig, ServiceConfig};
use anyhow::{Context, Result};
use shared_types::{Clock, SystemClock};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, warn};
use ur_01_profile_cache::{CacheAside, CacheBackend, InMemoryCache, RedisCache};
use ur_02_rating_engine::{RatingApi, RatingEngine, VoteLedger};
use ur_03_profile_reader::{ProfileDirectory, ProfileReader};
use ur_04_profile_store::{
    AccountStore, ConnectionWatchdog, InMemoryStore, PostgresStore, WatchdogError,
};
use ur_05_api_gateway::ApiGatewayService;

/// Store handles, one per port, all backed by the same adapter.
struct Stores {
    accounts: Arc<dyn AccountStore>,
    directory: Arc<dyn ProfileDirectory>,
    ledger: Arc<dyn VoteLedger>,
    postgres: Option<Arc<PostgresStore>>,
}

async fn open_stores(config: &DatabaseConfig) -> Result<Stores> {
    match config.postgres() {
        Some(pg) => {
            let store = Arc::new(
                PostgresStore::connect(pg)
                    .await
                    .context("failed to connect to PostgreSQL")?,
            );
            Ok(Stores {
                accounts: store.clone(),
                directory: store.clone(),
                ledger: store.clone(),
                postgres: Some(store),
            })
        }
        None => {
            warn!("DATABASE_URL not set, using the in-memory store; data is lost on exit");
            let store = Arc::new(InMemoryStore::new());
            Ok(Stores {
                accounts: store.clone(),
                directory: store.clone(),
                ledger: store,
                postgres: None,
            })
        }
    }
}

/// A Redis that cannot be reached at startup degrades to the in-memory cache;
/// the cache is never required for correctness.
async fn open_cache(config: &CacheConfig) -> Arc<dyn CacheBackend> {
    let Some(addr) = config.redis_addr.as_deref() else {
        info!("REDIS_ADDR not set, using the in-memory cache");
        return Arc::new(InMemoryCache::new());
    };
    match RedisCache::connect(addr, config.db_index).await {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            error!("redis at {} unavailable ({}), using the in-memory cache", addr, e);
            Arc::new(InMemoryCache::new())
        }
    }
}

/// Which task ended the serve loop.
enum Exit {
    Signal,
    Server(Result<Result<(), ur_05_api_gateway::GatewayError>, JoinError>),
    Watchdog(Result<Result<(), WatchdogError>, JoinError>),
}

fn flatten<E>(result: Result<Result<(), E>, JoinError>) -> Result<()>
where
    E: std::error::Error + Send + Sync + 'static,
{
    Ok(result??)
}

async fn watchdog_exit(
    handle: &mut Option<JoinHandle<Result<(), WatchdogError>>>,
) -> Result<Result<(), WatchdogError>, JoinError> {
    match handle {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

/// The wired service.
pub struct ServiceRuntime {
    config: ServiceConfig,
    gateway: ApiGatewayService,
    postgres: Option<Arc<PostgresStore>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl ServiceRuntime {
    /// Validates configuration, opens backends and wires every subsystem.
    pub async fn build(config: ServiceConfig) -> Result<Self> {
        config.validate().context("invalid configuration")?;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let stores = open_stores(&config.database).await?;
        let cache = CacheAside::new(open_cache(&config.cache).await, config.cache.ttl);

        let ratings: Arc<dyn RatingApi> = Arc::new(RatingEngine::new(
            stores.ledger,
            Arc::clone(&clock),
            config.rating,
        ));
        let reader = Arc::new(ProfileReader::new(
            stores.directory,
            Arc::clone(&ratings),
            cache,
            config.reader,
        ));
        let gateway = ApiGatewayService::new(
            config.gateway.clone(),
            stores.accounts,
            reader,
            ratings,
            clock,
        )
        .context("failed to build API gateway")?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Ok(Self {
            config,
            gateway,
            postgres: stores.postgres,
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Whether the PostgreSQL backend is in use.
    pub fn uses_postgres(&self) -> bool {
        self.postgres.is_some()
    }

    fn spawn_watchdog(&self) -> Option<JoinHandle<Result<(), WatchdogError>>> {
        if !self.config.database.conn_check {
            info!("connection check disabled");
            return None;
        }
        let store = self.postgres.as_ref()?;
        let watchdog = ConnectionWatchdog::new(store.clone(), self.config.database.watchdog);
        Some(tokio::spawn(watchdog.run(self.shutdown_rx.clone())))
    }

    /// Serves until `shutdown_signal` completes or a supervised task fails.
    ///
    /// Exhausted reconnects are fatal: the listener is drained, the pool is
    /// closed and the error is returned.
    pub async fn run(self, shutdown_signal: impl Future<Output = ()>) -> Result<()> {
        info!("===========================================");
        info!("  User Rating Service v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let mut watchdog = self.spawn_watchdog();
        let mut server = tokio::spawn(self.gateway.serve(self.shutdown_rx.clone()));
        tokio::pin!(shutdown_signal);

        let exit = tokio::select! {
            _ = &mut shutdown_signal => Exit::Signal,
            result = &mut server => Exit::Server(result),
            result = watchdog_exit(&mut watchdog) => Exit::Watchdog(result),
        };

        info!("Initiating graceful shutdown...");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let outcome = match exit {
            Exit::Signal => flatten(server.await).context("HTTP server failed"),
            Exit::Server(result) => {
                flatten(result).context("HTTP server stopped unexpectedly")
            }
            Exit::Watchdog(result) => {
                watchdog = None;
                if let Err(e) = flatten(server.await) {
                    error!("HTTP server failed during shutdown: {:#}", e);
                }
                match flatten(result) {
                    Ok(()) => Err(anyhow::anyhow!("connection watchdog stopped unexpectedly")),
                    Err(e) => Err(e.context("database connection lost")),
                }
            }
        };

        if let Some(handle) = watchdog {
            if let Err(e) = flatten(handle.await) {
                warn!("connection watchdog ended with error: {:#}", e);
            }
        }
        if let Some(store) = &self.postgres {
            store.close().await;
        }

        info!("Shutdown complete");
        outcome
    }
}
