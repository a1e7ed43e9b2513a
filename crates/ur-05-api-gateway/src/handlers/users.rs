//! Profile and session handlers.

use crate::auth::AuthenticatedUser;
use crate::domain::{
    check_password, normalize_nickname, ApiError, CreateUserRequest, CreatedResponse, ListQuery,
    LoginRequest, LoginResponse, MessageResponse, UpdatePasswordRequest, UpdateStateRequest,
    UpdateUserRequest,
};
use crate::router::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use shared_types::{
    NewProfile, Page, Profile, ProfileId, ProfileSnapshot, ProfileUpdate, Role,
    State as LifecycleState, StoreError,
};
use std::sync::Arc;
use tracing::info;

const INVALID_NICKNAME: &str = "nickname must be 1 to 64 characters";

fn invalid_credentials() -> ApiError {
    ApiError::new(StatusCode::UNAUTHORIZED, "invalid nickname or password")
}

async fn hash_password(state: &AppState, password: String) -> Result<String, ApiError> {
    let hasher = Arc::clone(&state.hasher);
    match tokio::task::spawn_blocking(move || hasher.hash(&password)).await {
        Ok(Ok(encoded)) => Ok(encoded),
        Ok(Err(e)) => Err(ApiError::internal(&e)),
        Err(e) => Err(ApiError::internal(&e)),
    }
}

async fn verify_password(
    state: &AppState,
    password: String,
    encoded: String,
) -> Result<bool, ApiError> {
    let hasher = Arc::clone(&state.hasher);
    tokio::task::spawn_blocking(move || hasher.verify(&password, &encoded))
        .await
        .map_err(|e| ApiError::internal(&e))
}

fn profile_update(request: UpdateUserRequest) -> Result<ProfileUpdate, ApiError> {
    let nickname =
        normalize_nickname(&request.nickname).ok_or_else(|| ApiError::bad_request(INVALID_NICKNAME))?;
    Ok(ProfileUpdate {
        nickname,
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
    })
}

/// `POST /api/users`
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let Json(request) = payload?;
    let nickname =
        normalize_nickname(&request.nickname).ok_or_else(|| ApiError::bad_request(INVALID_NICKNAME))?;
    check_password(&request.password)?;
    let password_hash = hash_password(&state, request.password).await?;

    let now = state.clock.now();
    let profile = Profile {
        id: ProfileId::new_random(),
        nickname,
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        created_at: now,
        updated_at: now,
        state: LifecycleState::Active,
        role: Role::User,
        rating: 0,
    };
    let id = state
        .accounts
        .create_profile(NewProfile {
            profile,
            password_hash,
        })
        .await?;

    info!("[ur-05] created profile {}", id);
    Ok((StatusCode::CREATED, Json(CreatedResponse { oid: id })))
}

/// `POST /api/users/login`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;
    let nickname = request.nickname.trim();

    let encoded = match state.accounts.password_hash(nickname).await {
        Ok(encoded) => encoded,
        Err(StoreError::NotFound) => return Err(invalid_credentials()),
        Err(e) => return Err(e.into()),
    };
    if !verify_password(&state, request.password, encoded).await? {
        return Err(invalid_credentials());
    }

    let subject = match state.accounts.session_subject(nickname).await {
        Ok(subject) => subject,
        Err(StoreError::NotFound) => return Err(invalid_credentials()),
        Err(e) => return Err(e.into()),
    };
    if subject.state != LifecycleState::Active {
        return Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            "profile is banned or deleted",
        ));
    }

    let issued = state
        .sessions
        .issue(&subject, state.clock.now())
        .map_err(|e| ApiError::internal(&e))?;
    info!("[ur-05] session issued for {}", subject.id);
    Ok(Json(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

/// `GET /api/users/:id`
pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<ProfileId>, PathRejection>,
) -> Result<Json<ProfileSnapshot>, ApiError> {
    let Path(id) = path?;
    Ok(Json(state.reader.get_profile(id).await?))
}

/// `GET /api/users?page=&limit=`
pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Page<Profile>>, ApiError> {
    let Query(query) = query?;
    let page = state
        .reader
        .get_profile_list(query.page, query.limit)
        .await?;
    Ok(Json(page))
}

/// `PUT /api/users/:id`
pub async fn update_user(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    path: Result<Path<ProfileId>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = path?;
    if !user.may_edit(id) {
        return Err(ApiError::forbidden());
    }
    let Json(request) = payload?;
    let update = profile_update(request)?;

    state
        .accounts
        .update_profile(id, update, state.clock.now())
        .await?;
    state.reader.invalidate_profile(id).await;
    Ok(Json(MessageResponse::new("profile updated")))
}

/// `PUT /api/users/:id/password`
pub async fn update_password(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    path: Result<Path<ProfileId>, PathRejection>,
    payload: Result<Json<UpdatePasswordRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = path?;
    if !user.may_edit(id) {
        return Err(ApiError::forbidden());
    }
    let Json(request) = payload?;
    check_password(&request.password)?;
    let password_hash = hash_password(&state, request.password).await?;

    state
        .accounts
        .update_password(id, password_hash, state.clock.now())
        .await?;
    state.reader.invalidate_profile(id).await;
    Ok(Json(MessageResponse::new("password updated")))
}

/// `PUT /api/users/:id/state`: moderators and admins ban or reinstate.
pub async fn update_state(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    path: Result<Path<ProfileId>, PathRejection>,
    payload: Result<Json<UpdateStateRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = path?;
    if !user.role.is_staff() {
        return Err(ApiError::forbidden());
    }
    if user.id == id {
        return Err(ApiError::bad_request("cannot change your own state"));
    }
    let Json(request) = payload?;
    let new_state = match LifecycleState::try_from(request.state) {
        Ok(s @ (LifecycleState::Active | LifecycleState::Banned)) => s,
        _ => {
            return Err(ApiError::bad_request(
                "state must be 0 (banned) or 1 (active)",
            ))
        }
    };

    state
        .accounts
        .set_state(id, new_state, state.clock.now())
        .await?;
    state.reader.invalidate_profile(id).await;
    info!("[ur-05] {} set state of {} to {:?}", user.id, id, new_state);
    Ok(Json(MessageResponse::new("state updated")))
}

/// `DELETE /api/users/:id`
pub async fn delete_user(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    path: Result<Path<ProfileId>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = path?;
    if !user.may_delete(id) {
        return Err(ApiError::forbidden());
    }

    state
        .accounts
        .delete_profile(id, state.clock.now())
        .await?;
    state.reader.invalidate_profile(id).await;
    info!("[ur-05] profile {} deleted by {}", id, user.id);
    Ok(Json(MessageResponse::new("profile deleted")))
}
