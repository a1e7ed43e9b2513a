//! # In-Memory Profile Store
//!
//! All tables live behind one mutex, so every operation is a transaction:
//! checks and writes of `record_vote` and `change_vote` can never interleave
//! with another request.

use crate::ports::AccountStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use shared_types::{
    Category, NewProfile, Profile, ProfileId, ProfileUpdate, SessionSubject, State, StoreError,
    StoreResult, Vote,
};
use std::collections::HashMap;
use ur_02_rating_engine::{Breakdown, ChangeOutcome, RecordOutcome, VoteLedger};
use ur_03_profile_reader::ProfileDirectory;

struct Account {
    profile: Profile,
    password_hash: String,
}

#[derive(Default)]
struct Tables {
    accounts: HashMap<ProfileId, Account>,
    nicknames: HashMap<String, ProfileId>,
    votes: HashMap<(ProfileId, ProfileId), Vote>,
    counters: HashMap<ProfileId, Breakdown>,
}

impl Tables {
    /// A profile that is not deleted.
    fn live_mut(&mut self, id: ProfileId) -> StoreResult<&mut Account> {
        match self.accounts.get_mut(&id) {
            Some(account) if account.profile.state != State::Deleted => Ok(account),
            _ => Err(StoreError::NotFound),
        }
    }

    fn live_by_nickname(&self, nickname: &str) -> StoreResult<&Account> {
        self.nicknames
            .get(nickname)
            .and_then(|id| self.accounts.get(id))
            .filter(|account| account.profile.state != State::Deleted)
            .ok_or(StoreError::NotFound)
    }

    fn last_voted_at(&self, voter: ProfileId) -> Option<DateTime<Utc>> {
        self.votes
            .values()
            .filter(|v| v.voter == voter)
            .map(|v| v.voted_at)
            .max()
    }
}

/// In-memory implementation of every store port.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live votes held.
    pub fn vote_count(&self) -> usize {
        self.tables.lock().votes.len()
    }
}

// =============================================================================
// AccountStore
// =============================================================================

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn create_profile(&self, new: NewProfile) -> StoreResult<ProfileId> {
        let mut tables = self.tables.lock();
        let id = new.profile.id;
        if tables.accounts.contains_key(&id) {
            return Err(StoreError::Conflict("profiles_pkey".into()));
        }
        if tables.nicknames.contains_key(&new.profile.nickname) {
            return Err(StoreError::Conflict("profiles_nickname_key".into()));
        }
        tables.nicknames.insert(new.profile.nickname.clone(), id);
        tables.accounts.insert(
            id,
            Account {
                profile: new.profile,
                password_hash: new.password_hash,
            },
        );
        Ok(id)
    }

    async fn update_profile(
        &self,
        id: ProfileId,
        update: ProfileUpdate,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        let current = tables.live_mut(id)?.profile.nickname.clone();
        if current != update.nickname {
            if tables.nicknames.contains_key(&update.nickname) {
                return Err(StoreError::Conflict("profiles_nickname_key".into()));
            }
            tables.nicknames.remove(&current);
            tables.nicknames.insert(update.nickname.clone(), id);
        }

        let profile = &mut tables.live_mut(id)?.profile;
        profile.nickname = update.nickname;
        profile.first_name = update.first_name;
        profile.last_name = update.last_name;
        profile.updated_at = updated_at;
        Ok(())
    }

    async fn update_password(
        &self,
        id: ProfileId,
        password_hash: String,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        let account = tables.live_mut(id)?;
        account.password_hash = password_hash;
        account.profile.updated_at = updated_at;
        Ok(())
    }

    async fn password_hash(&self, nickname: &str) -> StoreResult<String> {
        let tables = self.tables.lock();
        Ok(tables.live_by_nickname(nickname)?.password_hash.clone())
    }

    async fn session_subject(&self, nickname: &str) -> StoreResult<SessionSubject> {
        let tables = self.tables.lock();
        let profile = &tables.live_by_nickname(nickname)?.profile;
        Ok(SessionSubject {
            id: profile.id,
            nickname: profile.nickname.clone(),
            role: profile.role,
            state: profile.state,
        })
    }

    async fn state_of(&self, id: ProfileId) -> StoreResult<State> {
        let tables = self.tables.lock();
        tables
            .accounts
            .get(&id)
            .map(|account| account.profile.state)
            .ok_or(StoreError::NotFound)
    }

    async fn set_state(
        &self,
        id: ProfileId,
        state: State,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        let profile = &mut tables.live_mut(id)?.profile;
        profile.state = state;
        profile.updated_at = updated_at;
        Ok(())
    }

    async fn delete_profile(&self, id: ProfileId, updated_at: DateTime<Utc>) -> StoreResult<()> {
        self.set_state(id, State::Deleted, updated_at).await
    }
}

// =============================================================================
// ProfileDirectory
// =============================================================================

#[async_trait]
impl ProfileDirectory for InMemoryStore {
    async fn get_profile(&self, id: ProfileId) -> StoreResult<Profile> {
        let tables = self.tables.lock();
        tables
            .accounts
            .get(&id)
            .map(|account| account.profile.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn list_profiles(&self, limit: u32, offset: u64) -> StoreResult<Vec<Profile>> {
        let tables = self.tables.lock();
        let mut live: Vec<&Profile> = tables
            .accounts
            .values()
            .map(|account| &account.profile)
            .filter(|profile| profile.state != State::Deleted)
            .collect();
        live.sort_by_key(|profile| (profile.created_at, profile.id));

        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        Ok(live
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_profiles(&self) -> StoreResult<u64> {
        let tables = self.tables.lock();
        Ok(tables
            .accounts
            .values()
            .filter(|account| account.profile.state != State::Deleted)
            .count() as u64)
    }
}

// =============================================================================
// VoteLedger
// =============================================================================

#[async_trait]
impl VoteLedger for InMemoryStore {
    async fn find_vote(&self, voter: ProfileId, target: ProfileId) -> StoreResult<Option<Vote>> {
        Ok(self.tables.lock().votes.get(&(voter, target)).cloned())
    }

    async fn last_voted_at(&self, voter: ProfileId) -> StoreResult<Option<DateTime<Utc>>> {
        Ok(self.tables.lock().last_voted_at(voter))
    }

    async fn record_vote(
        &self,
        vote: &Vote,
        cooldown_cutoff: DateTime<Utc>,
    ) -> StoreResult<RecordOutcome> {
        let mut tables = self.tables.lock();
        if tables.live_mut(vote.target).is_err() {
            return Ok(RecordOutcome::UnknownTarget);
        }
        if tables.votes.contains_key(&(vote.voter, vote.target)) {
            return Ok(RecordOutcome::Duplicate);
        }
        if let Some(last_voted_at) = tables.last_voted_at(vote.voter) {
            if last_voted_at > cooldown_cutoff {
                return Ok(RecordOutcome::CoolingDown { last_voted_at });
            }
        }

        tables
            .votes
            .insert((vote.voter, vote.target), vote.clone());
        tables
            .counters
            .entry(vote.target)
            .or_default()
            .increment(vote.category);
        tables.live_mut(vote.target)?.profile.rating += 1;
        Ok(RecordOutcome::Recorded)
    }

    async fn change_vote(
        &self,
        voter: ProfileId,
        target: ProfileId,
        category: Category,
        voted_at: DateTime<Utc>,
    ) -> StoreResult<ChangeOutcome> {
        let mut tables = self.tables.lock();
        let Some(vote) = tables.votes.get_mut(&(voter, target)) else {
            return Ok(ChangeOutcome::Missing);
        };
        let previous = vote.category;
        if previous == category {
            return Ok(ChangeOutcome::Unchanged);
        }
        vote.category = category;
        vote.voted_at = voted_at;

        let counters = tables.counters.entry(target).or_default();
        counters.decrement(previous);
        counters.increment(category);
        Ok(ChangeOutcome::Changed { previous })
    }

    async fn category_counts(&self, target: ProfileId) -> StoreResult<Breakdown> {
        Ok(self
            .tables
            .lock()
            .counters
            .get(&target)
            .copied()
            .unwrap_or_default())
    }

    async fn totals_for(&self, targets: &[ProfileId]) -> StoreResult<HashMap<ProfileId, u64>> {
        let tables = self.tables.lock();
        Ok(targets
            .iter()
            .filter_map(|id| {
                tables
                    .accounts
                    .get(id)
                    .map(|account| (*id, account.profile.rating))
            })
            .collect())
    }
}
