//! API error type and status mapping.
//!
//! Every failure leaves the gateway as `{"error": "<reason>"}`. Reasons come
//! from a fixed vocabulary; store error text is logged, never returned.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shared_types::StoreError;
use tracing::error;
use ur_02_rating_engine::{ErrorKind, RatingError};
use ur_03_profile_reader::ReadError;

use super::config::ConfigError;
use super::password::PasswordViolation;
use crate::auth::SessionError;
use std::net::SocketAddr;
use thiserror::Error;

/// Gateway startup and serving errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("session setup failed: {0}")]
    Session(#[from] SessionError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Reason returned for every internal failure.
pub const INTERNAL_REASON: &str = "internal server error";

/// API error with HTTP status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub reason: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }

    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, reason)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized")
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "permission denied")
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, reason)
    }

    /// Logs `cause` and hides it behind the generic reason.
    pub fn internal(cause: &dyn std::error::Error) -> Self {
        error!(error = %cause, source = ?cause.source(), "[ur-05] request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_REASON)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: &self.reason,
        });
        (self.status, body).into_response()
    }
}

impl From<RatingError> for ApiError {
    fn from(err: RatingError) -> Self {
        match err.kind() {
            ErrorKind::Validation | ErrorKind::BusinessRule => Self::bad_request(err.to_string()),
            ErrorKind::NotFound => Self::not_found(err.to_string()),
            ErrorKind::Unavailable => Self::internal(&err),
        }
    }
}

impl From<ReadError> for ApiError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::NotFound => Self::not_found("profile not found"),
            other => Self::internal(&other),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::not_found("profile not found"),
            StoreError::Conflict(_) => Self::bad_request("nickname already taken"),
            other => Self::internal(&other),
        }
    }
}

impl From<PasswordViolation> for ApiError {
    fn from(err: PasswordViolation) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(_: SessionError) -> Self {
        Self::unauthorized()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(_: JsonRejection) -> Self {
        Self::bad_request("malformed request body")
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        Self::bad_request("malformed identifier")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(_: QueryRejection) -> Self {
        Self::bad_request("malformed query")
    }
}
