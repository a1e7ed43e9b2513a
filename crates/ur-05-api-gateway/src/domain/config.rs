//! Gateway configuration with validation.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

/// Minimum length of the session signing key.
pub const MIN_SESSION_KEY_LEN: usize = 32;

/// Main gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 8080)
    pub port: u16,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Session token configuration
    pub session: SessionConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8080,
            cors: CorsConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.key.is_empty() {
            return Err(ConfigError::MissingSessionKey);
        }
        if self.session.key.len() < MIN_SESSION_KEY_LEN && !self.session.allow_insecure_key {
            return Err(ConfigError::WeakSessionKey {
                len: self.session.key.len(),
            });
        }
        if self.session.lifetime.is_zero() {
            return Err(ConfigError::Invalid("session lifetime cannot be 0".into()));
        }
        if self.session.hash_iterations == 0 {
            return Err(ConfigError::Invalid("hash iterations cannot be 0".into()));
        }
        Ok(())
    }

    /// HTTP bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins ("*" for all)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            allowed_headers: vec!["Content-Type".to_string(), "Authorization".to_string()],
            max_age: 86400, // 24 hours
        }
    }
}

/// Session and credential settings
#[derive(Clone)]
pub struct SessionConfig {
    /// HMAC key for session tokens
    pub key: Vec<u8>,
    /// Accept keys shorter than `MIN_SESSION_KEY_LEN` (development only)
    pub allow_insecure_key: bool,
    /// Token lifetime
    pub lifetime: Duration,
    /// Iterations of the credential hash
    pub hash_iterations: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            key: Vec::new(),
            allow_insecure_key: false,
            lifetime: Duration::from_secs(24 * 60 * 60),
            hash_iterations: 10_000,
        }
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("key", &format_args!("<{} bytes>", self.key.len()))
            .field("allow_insecure_key", &self.allow_insecure_key)
            .field("lifetime", &self.lifetime)
            .field("hash_iterations", &self.hash_iterations)
            .finish()
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("session key is not set")]
    MissingSessionKey,
    #[error("session key has {len} bytes, need at least {min}", min = MIN_SESSION_KEY_LEN)]
    WeakSessionKey { len: usize },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
