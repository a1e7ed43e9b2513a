//! Route table and shared handler state.

use crate::auth::{CredentialHasher, SessionKeys};
use crate::domain::config::CorsConfig;
use crate::handlers::{users, votes};
use crate::middleware::create_cors_layer;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use shared_types::Clock;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use ur_02_rating_engine::RatingApi;
use ur_03_profile_reader::ProfileReader;
use ur_04_profile_store::AccountStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub reader: Arc<ProfileReader>,
    pub ratings: Arc<dyn RatingApi>,
    pub sessions: Arc<SessionKeys>,
    pub hasher: Arc<dyn CredentialHasher>,
    pub clock: Arc<dyn Clock>,
}

/// Builds the full HTTP router.
pub fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(cors));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/users", post(users::create_user).get(users::list_users))
        .route("/api/users/login", post(users::login))
        .route(
            "/api/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/api/users/:id/password", put(users::update_password))
        .route("/api/users/:id/state", put(users::update_state))
        .route("/api/vote", post(votes::cast_vote).put(votes::change_vote))
        .layer(middleware)
        .with_state(state)
}

/// Health check handler
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "user-rating",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
