//! Row types and their conversion into domain entities.

use chrono::{DateTime, Utc};
use shared_types::{Category, Profile, ProfileId, Role, SessionSubject, State, StoreError};
use sqlx::FromRow;
use uuid::Uuid;

/// Columns selected for a profile read.
pub(super) const PROFILE_COLUMNS: &str =
    "oid, nickname, first_name, last_name, created_at, updated_at, state, user_role, rating";

#[derive(Debug, Clone, FromRow)]
pub(super) struct ProfileRow {
    pub oid: Uuid,
    pub nickname: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub state: i16,
    pub user_role: i16,
    pub rating: i64,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = StoreError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(Profile {
            id: ProfileId(row.oid),
            nickname: row.nickname,
            first_name: row.first_name,
            last_name: row.last_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
            state: decode_state(row.state)?,
            role: decode_role(row.user_role)?,
            rating: u64::try_from(row.rating)
                .map_err(|_| StoreError::Corrupt(format!("negative rating {}", row.rating)))?,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub(super) struct SubjectRow {
    pub oid: Uuid,
    pub nickname: String,
    pub user_role: i16,
    pub state: i16,
}

impl TryFrom<SubjectRow> for SessionSubject {
    type Error = StoreError;

    fn try_from(row: SubjectRow) -> Result<Self, Self::Error> {
        Ok(SessionSubject {
            id: ProfileId(row.oid),
            nickname: row.nickname,
            role: decode_role(row.user_role)?,
            state: decode_state(row.state)?,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub(super) struct VoteRow {
    pub from_oid: Uuid,
    pub to_oid: Uuid,
    pub emoji: i16,
    pub voted_at: DateTime<Utc>,
}

/// One per-category counter.
#[derive(Debug, Clone, FromRow)]
pub(super) struct CounterRow {
    pub emoji: i16,
    pub votes: i64,
}

/// Total live votes of one target.
#[derive(Debug, Clone, FromRow)]
pub(super) struct TotalRow {
    pub oid: Uuid,
    pub rating: i64,
}

pub(super) fn decode_state(code: i16) -> Result<State, StoreError> {
    State::try_from(code).map_err(|e| StoreError::Corrupt(e.to_string()))
}

pub(super) fn decode_role(code: i16) -> Result<Role, StoreError> {
    Role::try_from(code).map_err(|e| StoreError::Corrupt(e.to_string()))
}

pub(super) fn decode_category(code: i16) -> Result<Category, StoreError> {
    Category::try_from(i32::from(code)).map_err(|e| StoreError::Corrupt(e.to_string()))
}

/// Category as stored in the `emoji` column.
pub(super) fn encode_category(category: Category) -> i16 {
    // 1..=5 always fits
    category.value() as i16
}

pub(super) fn decode_count(votes: i64) -> Result<u64, StoreError> {
    u64::try_from(votes).map_err(|_| StoreError::Corrupt(format!("negative vote count {}", votes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ProfileRow {
        let at = Utc::now();
        ProfileRow {
            oid: Uuid::new_v4(),
            nickname: "ada".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            created_at: at,
            updated_at: at,
            state: 1,
            user_role: 3,
            rating: 4,
        }
    }

    #[test]
    fn test_profile_row_decodes() {
        let profile = Profile::try_from(row()).unwrap();
        assert_eq!(profile.state, State::Active);
        assert_eq!(profile.role, Role::Admin);
        assert_eq!(profile.rating, 4);
    }

    #[test]
    fn test_bad_codes_are_corrupt() {
        let mut bad_state = row();
        bad_state.state = 9;
        assert!(matches!(
            Profile::try_from(bad_state),
            Err(StoreError::Corrupt(_))
        ));

        let mut bad_rating = row();
        bad_rating.rating = -1;
        assert!(matches!(
            Profile::try_from(bad_rating),
            Err(StoreError::Corrupt(_))
        ));

        assert!(decode_category(0).is_err());
        assert!(decode_count(-3).is_err());
    }

    #[test]
    fn test_category_column_roundtrip() {
        for category in Category::ALL {
            assert_eq!(decode_category(encode_category(category)).unwrap(), category);
        }
    }
}
