//! Vote handlers.
//!
//! The voter is always the authenticated caller.

use crate::auth::AuthenticatedUser;
use crate::domain::{ApiError, VoteRequest, VoteResponse};
use crate::router::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

/// `POST /api/vote`
pub async fn cast_vote(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<VoteResponse>), ApiError> {
    let Json(request) = payload?;
    let receipt = state
        .ratings
        .cast_vote(user.id, request.to_oid, request.emoji)
        .await?;
    state.reader.invalidate_profile(receipt.target).await;
    Ok((StatusCode::CREATED, Json(receipt.into())))
}

/// `PUT /api/vote`
pub async fn change_vote(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<VoteResponse>, ApiError> {
    let Json(request) = payload?;
    let receipt = state
        .ratings
        .change_vote(user.id, request.to_oid, request.emoji)
        .await?;
    state.reader.invalidate_profile(receipt.target).await;
    Ok(Json(receipt.into()))
}
