//! Bearer-token extractor for protected routes.

use crate::auth::SessionError;
use crate::domain::ApiError;
use crate::router::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use shared_types::{ProfileId, Role, State, StoreError};
use tracing::debug;

/// The caller of a protected route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: ProfileId,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Own profile, or any profile for moderators and admins.
    pub fn may_edit(&self, target: ProfileId) -> bool {
        self.id == target || self.role.is_staff()
    }

    /// Own profile, or any profile for admins.
    pub fn may_delete(&self, target: ProfileId) -> bool {
        self.id == target || self.role == Role::Admin
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = bearer_token(&parts.headers).ok_or_else(ApiError::unauthorized)?;
        let claims = state
            .sessions
            .verify(token, state.clock.now())
            .map_err(|e: SessionError| {
                debug!("[ur-05] rejected session token: {}", e);
                ApiError::unauthorized()
            })?;

        // Bans and deletions take effect on the next request.
        match state.accounts.state_of(claims.sub).await {
            Ok(State::Active) => Ok(Self {
                id: claims.sub,
                role: claims.role,
            }),
            Ok(other) => {
                debug!("[ur-05] session for {} refused, state {:?}", claims.sub, other);
                Err(ApiError::unauthorized())
            }
            Err(StoreError::NotFound) => Err(ApiError::unauthorized()),
            Err(e) => Err(ApiError::internal(&e)),
        }
    }
}
