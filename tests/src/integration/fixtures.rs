//! Shared wiring and fakes for the integration flows.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use shared_types::{
    Category, MockClock, NewProfile, Profile, ProfileId, Role, State, StoreError, StoreResult,
    Vote,
};
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use ur_01_profile_cache::{CacheAside, CacheBackend, CacheError, CacheKey, InMemoryCache};
use ur_02_rating_engine::{
    Breakdown, ChangeOutcome, RatingApi, RatingEngine, RatingPolicy, RecordOutcome, VoteLedger,
};
use ur_03_profile_reader::{ProfileReader, ReaderConfig};
use ur_04_profile_store::{AccountStore, InMemoryStore};

pub const CACHE_TTL: Duration = Duration::from_secs(60);

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
}

/// Every subsystem wired over one in-memory store.
pub struct World {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MockClock>,
    pub ratings: Arc<dyn RatingApi>,
    pub reader: ProfileReader,
}

impl World {
    pub fn new() -> Self {
        Self::with_cache(Arc::new(InMemoryCache::new()))
    }

    pub fn with_cache(backend: Arc<dyn CacheBackend>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::assemble(store.clone(), store, backend)
    }

    /// Reads from `store`, writes votes through `ledger`.
    pub fn assemble(
        store: Arc<InMemoryStore>,
        ledger: Arc<dyn VoteLedger>,
        backend: Arc<dyn CacheBackend>,
    ) -> Self {
        let clock = Arc::new(MockClock::new(t0()));
        let ratings: Arc<dyn RatingApi> = Arc::new(RatingEngine::new(
            ledger,
            clock.clone(),
            RatingPolicy::default(),
        ));
        let reader = ProfileReader::new(
            store.clone(),
            ratings.clone(),
            CacheAside::new(backend, CACHE_TTL),
            ReaderConfig::default(),
        );
        Self {
            store,
            clock,
            ratings,
            reader,
        }
    }

    pub async fn seed(&self, nickname: &str) -> ProfileId {
        seed_profile(&self.store, nickname, t0()).await
    }
}

pub async fn seed_profile(
    store: &InMemoryStore,
    nickname: &str,
    created_at: DateTime<Utc>,
) -> ProfileId {
    store
        .create_profile(NewProfile {
            profile: Profile {
                id: ProfileId::new_random(),
                nickname: nickname.to_string(),
                first_name: "First".into(),
                last_name: "Last".into(),
                created_at,
                updated_at: created_at,
                state: State::Active,
                role: Role::User,
                rating: 0,
            },
            password_hash: "v1$1$00$00".into(),
        })
        .await
        .unwrap()
}

fn refused(op: &'static str) -> CacheError {
    CacheError::backend(op, io::Error::new(io::ErrorKind::ConnectionRefused, "refused"))
}

/// A cache whose backend is down.
pub struct DownCache;

#[async_trait]
impl CacheBackend for DownCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<String>, CacheError> {
        Err(refused("get"))
    }

    async fn set(&self, _key: &CacheKey, _value: String, _ttl: Duration) -> Result<(), CacheError> {
        Err(refused("set"))
    }

    async fn remove(&self, _key: &CacheKey) -> Result<(), CacheError> {
        Err(refused("remove"))
    }
}

/// A ledger that reads from `inner` but fails every write.
pub struct ReadOnlyLedger {
    pub inner: Arc<InMemoryStore>,
}

fn write_refused() -> StoreError {
    StoreError::unavailable(
        "write",
        io::Error::new(io::ErrorKind::BrokenPipe, "connection reset"),
    )
}

#[async_trait]
impl VoteLedger for ReadOnlyLedger {
    async fn find_vote(&self, voter: ProfileId, target: ProfileId) -> StoreResult<Option<Vote>> {
        self.inner.find_vote(voter, target).await
    }

    async fn last_voted_at(&self, voter: ProfileId) -> StoreResult<Option<DateTime<Utc>>> {
        self.inner.last_voted_at(voter).await
    }

    async fn record_vote(
        &self,
        _vote: &Vote,
        _cooldown_cutoff: DateTime<Utc>,
    ) -> StoreResult<RecordOutcome> {
        Err(write_refused())
    }

    async fn change_vote(
        &self,
        _voter: ProfileId,
        _target: ProfileId,
        _category: Category,
        _voted_at: DateTime<Utc>,
    ) -> StoreResult<ChangeOutcome> {
        Err(write_refused())
    }

    async fn category_counts(&self, target: ProfileId) -> StoreResult<Breakdown> {
        self.inner.category_counts(target).await
    }

    async fn totals_for(&self, targets: &[ProfileId]) -> StoreResult<HashMap<ProfileId, u64>> {
        self.inner.totals_for(targets).await
    }
}
