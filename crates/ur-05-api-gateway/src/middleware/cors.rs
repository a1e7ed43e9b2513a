//! CORS layer built from gateway configuration.
//!
//! Browsers send the session token in `Authorization`, so the layer never
//! allows credentials (cookies); a wildcard origin stays compatible with
//! bearer tokens.

use crate::domain::config::CorsConfig;
use axum::http::{HeaderName, HeaderValue, Method};
use std::str::FromStr;
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::warn;

/// Parses every configured entry, dropping (and logging) the malformed ones.
fn parse_entries<T: FromStr>(kind: &str, entries: &[String]) -> Vec<T> {
    entries
        .iter()
        .filter_map(|raw| match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("[ur-05] ignoring invalid CORS {} {:?}", kind, raw);
                None
            }
        })
        .collect()
}

fn is_wildcard(entries: &[String]) -> bool {
    entries.iter().any(|e| e.trim() == "*")
}

/// Create CORS layer from gateway config
pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    if !config.enabled {
        return CorsLayer::new();
    }

    let origins = if is_wildcard(&config.allowed_origins) {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(parse_entries::<HeaderValue>("origin", &config.allowed_origins))
    };
    let headers = if is_wildcard(&config.allowed_headers) {
        AllowHeaders::any()
    } else {
        AllowHeaders::list(parse_entries::<HeaderName>("header", &config.allowed_headers))
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(parse_entries::<Method>("method", &config.allowed_methods))
        .allow_headers(headers)
        .max_age(Duration::from_secs(config.max_age))
}
