//! Request and response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Category, ProfileId, Vote};
use ur_02_rating_engine::VoteReceipt;

/// Longest accepted nickname, in characters.
pub const MAX_NICKNAME_LEN: usize = 64;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub nickname: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub nickname: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    pub nickname: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStateRequest {
    pub state: i16,
}

/// Body of `POST /api/vote` and `PUT /api/vote`.
#[derive(Debug, Clone, Deserialize)]
pub struct VoteRequest {
    pub to_oid: ProfileId,
    pub emoji: i64,
}

/// `GET /api/users` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub oid: ProfileId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An accepted vote, with the category it replaced on a change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteResponse {
    #[serde(flatten)]
    pub vote: Vote,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<Category>,
}

impl From<VoteReceipt> for VoteResponse {
    fn from(receipt: VoteReceipt) -> Self {
        Self {
            vote: Vote {
                voter: receipt.voter,
                target: receipt.target,
                category: receipt.category,
                voted_at: receipt.voted_at,
            },
            previous: receipt.previous,
        }
    }
}

/// Trims a nickname and checks it is non-empty and not too long.
pub fn normalize_nickname(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_NICKNAME_LEN {
        None
    } else {
        Some(trimmed.to_string())
    }
}
