//! # Service Configuration
//!
//! Defaults overridden from environment variables, then validated.
//!
//! ## Security Requirements
//!
//! - `SESSION_KEY` MUST be set and at least 32 bytes, unless
//!   `ALLOW_INSECURE_SESSION_KEY=true` (development only)

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use ur_01_profile_cache::service::DEFAULT_TTL;
use ur_02_rating_engine::{RatingPolicy, DEFAULT_COOLDOWN_SECS};
use ur_03_profile_reader::ReaderConfig;
use ur_04_profile_store::{PostgresConfig, WatchdogConfig};
use ur_05_api_gateway::GatewayConfig;

/// Complete service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// `tracing` filter directive.
    pub log_level: String,
    /// HTTP listener, CORS and sessions.
    pub gateway: GatewayConfig,
    /// Transactional store.
    pub database: DatabaseConfig,
    /// Cache backend.
    pub cache: CacheConfig,
    /// List pagination.
    pub reader: ReaderConfig,
    /// Vote cooldown.
    pub rating: RatingPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            gateway: GatewayConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            reader: ReaderConfig::default(),
            rating: RatingPolicy::default(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; `None` selects the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
    /// Run the connection watchdog.
    pub conn_check: bool,
    pub watchdog: WatchdogConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            conn_check: true,
            watchdog: WatchdogConfig::default(),
        }
    }
}

impl DatabaseConfig {
    /// Pool settings, when a database is configured.
    pub fn postgres(&self) -> Option<PostgresConfig> {
        self.url.as_ref().map(|url| PostgresConfig {
            max_connections: self.max_connections,
            ..PostgresConfig::new(url.clone())
        })
    }
}

/// Cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Redis `host:port`; `None` selects the in-memory cache.
    pub redis_addr: Option<String>,
    pub db_index: u32,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_addr: None,
            db_index: 0,
            ttl: DEFAULT_TTL,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidVar {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("DEFAULT_PAGE_SIZE ({default}) exceeds MAX_PAGE_SIZE ({max})")]
    PageSizes { default: u32, max: u32 },

    #[error(transparent)]
    Gateway(#[from] ur_05_api_gateway::ConfigError),
}

impl ServiceConfig {
    /// Loads from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads from `lookup`; unset or empty variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);
        let mut config = Self::default();

        if let Some(level) = env.string("LOG_LEVEL") {
            config.log_level = level;
        }
        if let Some(port) = env.parse("PORT")? {
            config.gateway.port = port;
        }
        if let Some(key) = env.string("SESSION_KEY") {
            config.gateway.session.key = key.into_bytes();
        }
        if let Some(allow) = env.parse("ALLOW_INSECURE_SESSION_KEY")? {
            config.gateway.session.allow_insecure_key = allow;
        }

        config.database.url = env.string("DATABASE_URL");
        if let Some(max) = env.parse("DB_MAX_CONNECTIONS")? {
            config.database.max_connections = max;
        }
        if let Some(check) = env.parse("CONN_CHECK")? {
            config.database.conn_check = check;
        }
        if let Some(secs) = env.parse("RECONN_TIME")? {
            config.database.watchdog.interval = Duration::from_secs(secs);
        }
        if let Some(tries) = env.parse("RECONN_TRIES")? {
            config.database.watchdog.max_reconnects = tries;
        }

        config.cache.redis_addr = env.string("REDIS_ADDR");
        if let Some(index) = env.parse("REDIS_DB_INDEX")? {
            config.cache.db_index = index;
        }
        if let Some(secs) = env.parse("REDIS_EXP_TIME")? {
            config.cache.ttl = Duration::from_secs(secs);
        }

        if let Some(size) = env.parse("DEFAULT_PAGE_SIZE")? {
            config.reader.default_page_size = size;
        }
        if let Some(size) = env.parse("MAX_PAGE_SIZE")? {
            config.reader.max_page_size = size;
        }
        let cooldown: i64 = env.parse("VOTE_COOLDOWN_SECS")?.unwrap_or(DEFAULT_COOLDOWN_SECS);
        config.rating = RatingPolicy::with_cooldown_secs(cooldown);

        Ok(config)
    }

    /// Validate configuration before anything is started.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gateway.validate()?;
        if self.database.max_connections == 0 {
            return Err(ConfigError::Zero("DB_MAX_CONNECTIONS"));
        }
        if self.database.conn_check && self.database.watchdog.interval.is_zero() {
            return Err(ConfigError::Zero("RECONN_TIME"));
        }
        if self.cache.ttl.is_zero() {
            return Err(ConfigError::Zero("REDIS_EXP_TIME"));
        }
        if self.reader.default_page_size == 0 {
            return Err(ConfigError::Zero("DEFAULT_PAGE_SIZE"));
        }
        if self.reader.default_page_size > self.reader.max_page_size {
            return Err(ConfigError::PageSizes {
                default: self.reader.default_page_size,
                max: self.reader.max_page_size,
            });
        }
        if self.rating.cooldown <= chrono::Duration::zero() {
            return Err(ConfigError::Zero("VOTE_COOLDOWN_SECS"));
        }
        Ok(())
    }
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn string(&self, var: &str) -> Option<String> {
        (self.0)(var)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse<T>(&self, var: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let Some(raw) = self.string(var) else {
            return Ok(None);
        };
        match raw.parse() {
            Ok(value) => {
                info!("{} loaded from environment", var);
                Ok(Some(value))
            }
            Err(e) => Err(ConfigError::InvalidVar {
                var,
                value: raw,
                reason: e.to_string(),
            }),
        }
    }
}
