//! # Core Domain Entities
//!
//! Defines the profile and rating entities shared by every subsystem.
//!
//! ## Clusters
//!
//! - **Profiles**: `ProfileId`, `Profile`, `NewProfile`, `ProfileUpdate`,
//!   `SessionSubject`, `ProfileSnapshot`
//! - **Lifecycle**: `State`, `Role`
//! - **Rating**: `Category`, `Vote`
//! - **Queries**: `Page`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// CLUSTER A: PROFILES
// =============================================================================

/// Opaque unique identifier of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub Uuid);

impl ProfileId {
    /// Generates a fresh random identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ProfileId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for ProfileId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Lifecycle state of a profile.
///
/// Serialized as its integer code: `Deleted = -1`, `Banned = 0`, `Active = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum State {
    /// Soft-deleted; kept for referential integrity of votes.
    Deleted,
    /// Banned by a moderator; sessions are rejected.
    Banned,
    /// Normal, usable profile.
    Active,
}

impl State {
    /// Integer code as persisted.
    pub fn code(self) -> i16 {
        match self {
            State::Deleted => -1,
            State::Banned => 0,
            State::Active => 1,
        }
    }
}

impl From<State> for i16 {
    fn from(state: State) -> Self {
        state.code()
    }
}

impl TryFrom<i16> for State {
    type Error = UnknownCode;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(State::Deleted),
            0 => Ok(State::Banned),
            1 => Ok(State::Active),
            other => Err(UnknownCode {
                kind: "state",
                code: other.into(),
            }),
        }
    }
}

/// Authorization role of a profile.
///
/// Serialized as its integer code: `User = 1`, `Moderator = 2`, `Admin = 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum Role {
    /// Regular user; may only modify their own profile.
    #[default]
    User,
    /// May modify other profiles and moderate state.
    Moderator,
    /// Full rights, including deleting other profiles.
    Admin,
}

impl Role {
    /// Integer code as persisted.
    pub fn code(self) -> i16 {
        match self {
            Role::User => 1,
            Role::Moderator => 2,
            Role::Admin => 3,
        }
    }

    /// Whether this role may act on profiles other than its own.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Moderator | Role::Admin)
    }
}

impl From<Role> for i16 {
    fn from(role: Role) -> Self {
        role.code()
    }
}

impl TryFrom<i16> for Role {
    type Error = UnknownCode;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Role::User),
            2 => Ok(Role::Moderator),
            3 => Ok(Role::Admin),
            other => Err(UnknownCode {
                kind: "role",
                code: other.into(),
            }),
        }
    }
}

/// An integer code that does not map to any known enum variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code: {code}")]
pub struct UnknownCode {
    /// Which enumeration was being decoded.
    pub kind: &'static str,
    /// The offending code.
    pub code: i64,
}

/// Canonical profile record as owned by the transactional store.
///
/// Never carries the credential hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "oid")]
    pub id: ProfileId,
    pub nickname: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub state: State,
    #[serde(rename = "user_role")]
    pub role: Role,
    /// Denormalized count of live votes targeting this profile.
    #[serde(default)]
    pub rating: u64,
}

/// A profile about to be registered, together with its credential hash.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub profile: Profile,
    pub password_hash: String,
}

/// Mutable, user-editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub nickname: String,
    pub first_name: String,
    pub last_name: String,
}

/// The identity facts needed to issue or re-check a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSubject {
    pub id: ProfileId,
    pub nickname: String,
    pub role: Role,
    pub state: State,
}

/// Public read view of a single profile, including its rating breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    #[serde(rename = "oid")]
    pub id: ProfileId,
    pub nickname: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub state: State,
    #[serde(rename = "user_role")]
    pub role: Role,
    /// Stable `label:count` listing over every rating category.
    pub rating: String,
    /// Number of live votes targeting the profile.
    pub votes: u64,
}

impl ProfileSnapshot {
    /// Composes the public view from a profile record and its rating facts.
    pub fn compose(profile: Profile, rating: String, votes: u64) -> Self {
        Self {
            id: profile.id,
            nickname: profile.nickname,
            first_name: profile.first_name,
            last_name: profile.last_name,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
            state: profile.state,
            role: profile.role,
            rating,
            votes,
        }
    }
}

// =============================================================================
// CLUSTER B: RATING
// =============================================================================

/// A rating category ("emoji") a voter can give; values 1 through 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Category {
    Awful,
    Poor,
    Fair,
    Good,
    Great,
}

impl Category {
    /// Every category in ascending value order.
    pub const ALL: [Category; 5] = [
        Category::Awful,
        Category::Poor,
        Category::Fair,
        Category::Good,
        Category::Great,
    ];

    /// The numeric value (1..=5).
    pub fn value(self) -> i32 {
        match self {
            Category::Awful => 1,
            Category::Poor => 2,
            Category::Fair => 3,
            Category::Good => 4,
            Category::Great => 5,
        }
    }

    /// Zero-based slot, for fixed-size per-category tables.
    pub fn index(self) -> usize {
        (self.value() - 1) as usize
    }

    /// Stable human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Awful => "awful",
            Category::Poor => "poor",
            Category::Fair => "fair",
            Category::Good => "good",
            Category::Great => "great",
        }
    }
}

impl From<Category> for i32 {
    fn from(category: Category) -> Self {
        category.value()
    }
}

impl TryFrom<i32> for Category {
    type Error = UnknownCode;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Category::Awful),
            2 => Ok(Category::Poor),
            3 => Ok(Category::Fair),
            4 => Ok(Category::Good),
            5 => Ok(Category::Great),
            other => Err(UnknownCode {
                kind: "category",
                code: other.into(),
            }),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A live vote: the current rating `voter` has given `target`.
///
/// At most one live vote exists per `(voter, target)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    #[serde(rename = "from_oid")]
    pub voter: ProfileId,
    #[serde(rename = "to_oid")]
    pub target: ProfileId,
    #[serde(rename = "emoji")]
    pub category: Category,
    pub voted_at: DateTime<Utc>,
}

// =============================================================================
// CLUSTER C: QUERIES
// =============================================================================

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub total_items: u64,
    pub current_page: u32,
    #[serde(rename = "users")]
    pub items: Vec<T>,
}
