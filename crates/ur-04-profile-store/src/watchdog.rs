//! # Connection Watchdog
//!
//! Periodically pings a store connection and reconnects when the ping fails.
//! A successful reconnect resets the failure count. Once more than
//! `max_reconnects` consecutive reconnects have failed the watchdog stops
//! with `WatchdogError::Exhausted`; the process must treat that as fatal.

use async_trait::async_trait;
use shared_types::StoreResult;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// A connection the watchdog can probe and re-establish.
#[async_trait]
pub trait MonitoredConnection: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// One cheap round trip.
    async fn ping(&self) -> StoreResult<()>;

    /// Replaces the underlying connection.
    async fn reconnect(&self) -> StoreResult<()>;
}

/// Watchdog settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchdogConfig {
    /// Time between pings.
    pub interval: Duration,
    /// Consecutive failed reconnects tolerated before giving up.
    pub max_reconnects: u32,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_reconnects: 5,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WatchdogError {
    #[error("{name}: connection lost, {attempts} reconnect attempts failed")]
    Exhausted { name: &'static str, attempts: u32 },
}

/// Supervises one connection until shutdown or exhaustion.
pub struct ConnectionWatchdog {
    target: Arc<dyn MonitoredConnection>,
    config: WatchdogConfig,
}

impl ConnectionWatchdog {
    pub fn new(target: Arc<dyn MonitoredConnection>, config: WatchdogConfig) -> Self {
        Self { target, config }
    }

    /// Runs until `shutdown` flips to `true` (Ok) or reconnects are exhausted.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<(), WatchdogError> {
        let name = self.target.name();
        info!(
            interval_secs = self.config.interval.as_secs(),
            max_reconnects = self.config.max_reconnects,
            "[ur-04] connection check started for {}",
            name
        );

        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;

        let mut failures: u32 = 0;
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("[ur-04] connection check for {} stopped", name);
                        return Ok(());
                    }
                    continue;
                }
            }

            let Err(e) = self.target.ping().await else {
                continue;
            };
            warn!("[ur-04] lost connection to {}: {}; reconnecting", name, e);

            match self.target.reconnect().await {
                Ok(()) => {
                    info!("[ur-04] reconnected to {}", name);
                    failures = 0;
                }
                Err(e) => {
                    failures += 1;
                    warn!(
                        attempt = failures,
                        "[ur-04] failed to reconnect to {}: {}", name, e
                    );
                    if failures > self.config.max_reconnects {
                        error!("[ur-04] giving up on {} after {} attempts", name, failures);
                        return Err(WatchdogError::Exhausted {
                            name,
                            attempts: failures,
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::StoreError;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    /// Connection whose health is flipped by the test.
    #[derive(Default)]
    struct ScriptedConnection {
        healthy: AtomicBool,
        reconnect_works: AtomicBool,
        pings: AtomicU32,
        reconnects: AtomicU32,
    }

    impl ScriptedConnection {
        fn down() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn up() -> Arc<Self> {
            let conn = Self::default();
            conn.healthy.store(true, Ordering::SeqCst);
            Arc::new(conn)
        }
    }

    fn refused() -> StoreError {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        StoreError::unavailable("ping", io)
    }

    #[async_trait]
    impl MonitoredConnection for ScriptedConnection {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn ping(&self) -> StoreResult<()> {
            self.pings.fetch_add(1, Ordering::SeqCst);
            if self.healthy.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(refused())
            }
        }

        async fn reconnect(&self) -> StoreResult<()> {
            self.reconnects.fetch_add(1, Ordering::SeqCst);
            if self.reconnect_works.load(Ordering::SeqCst) {
                self.healthy.store(true, Ordering::SeqCst);
                Ok(())
            } else {
                Err(refused())
            }
        }
    }

    fn config(max_reconnects: u32) -> WatchdogConfig {
        WatchdogConfig {
            interval: Duration::from_secs(5),
            max_reconnects,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_after_bounded_reconnects() {
        let conn = ScriptedConnection::down();
        let (_tx, rx) = watch::channel(false);

        let result = ConnectionWatchdog::new(conn.clone(), config(3)).run(rx).await;
        assert_eq!(
            result,
            Err(WatchdogError::Exhausted {
                name: "scripted",
                attempts: 4
            })
        );
        assert_eq!(conn.reconnects.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_reconnect_resets_failures() {
        let conn = ScriptedConnection::down();
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(ConnectionWatchdog::new(conn.clone(), config(2)).run(rx));

        // two failed attempts, one short of giving up
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(conn.reconnects.load(Ordering::SeqCst), 2);

        conn.reconnect_works.store(true, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(conn.healthy.load(Ordering::SeqCst));

        // a fresh outage gets every retry again
        conn.healthy.store(false, Ordering::SeqCst);
        conn.reconnect_works.store(false, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!handle.is_finished());

        tx.send(true).unwrap();
        assert_eq!(handle.await.unwrap(), Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_healthy_connection_only_pings() {
        let conn = ScriptedConnection::up();
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(ConnectionWatchdog::new(conn.clone(), config(1)).run(rx));

        tokio::time::sleep(Duration::from_secs(26)).await;
        assert_eq!(conn.pings.load(Ordering::SeqCst), 5);
        assert_eq!(conn.reconnects.load(Ordering::SeqCst), 0);

        tx.send(true).unwrap();
        assert_eq!(handle.await.unwrap(), Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_shutdown_sender_dropped() {
        let conn = ScriptedConnection::up();
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(ConnectionWatchdog::new(conn, config(1)).run(rx));

        drop(tx);
        assert_eq!(handle.await.unwrap(), Ok(()));
    }
}
