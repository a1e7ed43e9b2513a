//! Profile Reader - cache-aside read orchestration

use crate::domain::{PageRequest, ReadError, ReaderConfig};
use crate::ports::outbound::ProfileDirectory;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{Page, Profile, ProfileId, ProfileSnapshot, State};
use std::sync::Arc;
use tracing::{debug, warn};
use ur_01_profile_cache::{CacheAside, CacheKey, CacheLookup};
use ur_02_rating_engine::RatingApi;

/// Read orchestrator over the profile store, rating engine and cache.
pub struct ProfileReader {
    directory: Arc<dyn ProfileDirectory>,
    ratings: Arc<dyn RatingApi>,
    cache: CacheAside,
    config: ReaderConfig,
}

impl ProfileReader {
    pub fn new(
        directory: Arc<dyn ProfileDirectory>,
        ratings: Arc<dyn RatingApi>,
        cache: CacheAside,
        config: ReaderConfig,
    ) -> Self {
        Self {
            directory,
            ratings,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Public snapshot of one profile, including its rating breakdown.
    pub async fn get_profile(&self, id: ProfileId) -> Result<ProfileSnapshot, ReadError> {
        let key = CacheKey::profile(id);
        if let Some(snapshot) = self.cached::<ProfileSnapshot>(&key).await {
            return Ok(snapshot);
        }

        let profile = self.directory.get_profile(id).await?;
        if profile.state == State::Deleted {
            return Err(ReadError::NotFound);
        }
        let breakdown = self.ratings.breakdown(id).await?;
        let snapshot = ProfileSnapshot::compose(profile, breakdown.to_string(), breakdown.total());

        self.populate(&key, &snapshot).await;
        Ok(snapshot)
    }

    /// One page of profiles with their vote totals.
    pub async fn get_profile_list(
        &self,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<Profile>, ReadError> {
        let request = PageRequest::clamp(page, page_size, &self.config);
        let key = CacheKey::page(request.page_size, request.offset());
        if let Some(cached) = self.cached::<Page<Profile>>(&key).await {
            return Ok(cached);
        }

        let mut rows = self
            .directory
            .list_profiles(request.page_size, request.offset())
            .await?;

        let ids: Vec<ProfileId> = rows.iter().map(|p| p.id).collect();
        let totals = self.ratings.totals_for_many(&ids).await?;
        for row in rows.iter_mut() {
            row.rating = totals.get(&row.id).copied().unwrap_or(0);
        }

        let total_items = if request.needs_total_count(rows.len()) {
            self.directory.count_profiles().await?
        } else {
            rows.len() as u64
        };

        let result = Page {
            total_items,
            current_page: request.page,
            items: rows,
        };
        self.populate(&key, &result).await;
        Ok(result)
    }

    /// Drops the cached snapshot of `id`. Failures are logged only.
    pub async fn invalidate_profile(&self, id: ProfileId) {
        if let Err(e) = self.cache.invalidate(&CacheKey::profile(id)).await {
            warn!("[ur-03] failed to invalidate cached profile {}: {}", id, e);
        }
    }

    /// Cache read that degrades every failure to a miss.
    async fn cached<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        match self.cache.lookup::<T>(key).await {
            Ok(CacheLookup::Hit(value)) => Some(value),
            Ok(CacheLookup::Miss) => None,
            Err(e) => {
                warn!("[ur-03] cache read for {} failed, reading through: {}", key, e);
                None
            }
        }
    }

    async fn populate<T: Serialize + Sync>(&self, key: &CacheKey, value: &T) {
        match self.cache.store(key, value).await {
            Ok(()) => debug!("[ur-03] cached {}", key),
            Err(e) => warn!("[ur-03] failed to cache {}: {}", key, e),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use parking_lot::Mutex;
    use shared_types::{Category, Role, StoreError, StoreResult};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use ur_01_profile_cache::adapters::memory::InMemoryCache;
    use ur_01_profile_cache::service::DEFAULT_TTL;
    use ur_01_profile_cache::CacheBackend;
    use ur_02_rating_engine::{Breakdown, RatingError, VoteReceipt};

    // =========================================================================
    // Test doubles
    // =========================================================================

    #[derive(Default)]
    struct MockDirectory {
        profiles: Mutex<Vec<Profile>>,
        reads: AtomicUsize,
        counts: AtomicUsize,
    }

    impl MockDirectory {
        fn with_profiles(n: usize) -> Self {
            let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            let profiles = (0..n)
                .map(|i| {
                    let at = start + Duration::minutes(i as i64);
                    Profile {
                        id: ProfileId::new_random(),
                        nickname: format!("user{}", i),
                        first_name: "First".into(),
                        last_name: "Last".into(),
                        created_at: at,
                        updated_at: at,
                        state: State::Active,
                        role: Role::User,
                        rating: 0,
                    }
                })
                .collect();
            Self {
                profiles: Mutex::new(profiles),
                ..Default::default()
            }
        }

        fn ids(&self) -> Vec<ProfileId> {
            self.profiles.lock().iter().map(|p| p.id).collect()
        }
    }

    #[async_trait]
    impl ProfileDirectory for MockDirectory {
        async fn get_profile(&self, id: ProfileId) -> StoreResult<Profile> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.profiles
                .lock()
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .ok_or(StoreError::NotFound)
        }

        async fn list_profiles(&self, limit: u32, offset: u64) -> StoreResult<Vec<Profile>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .profiles
                .lock()
                .iter()
                .filter(|p| p.state != State::Deleted)
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn count_profiles(&self) -> StoreResult<u64> {
            self.counts.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .profiles
                .lock()
                .iter()
                .filter(|p| p.state != State::Deleted)
                .count() as u64)
        }
    }

    #[derive(Default)]
    struct StubRatings {
        breakdowns: Mutex<HashMap<ProfileId, Breakdown>>,
    }

    impl StubRatings {
        fn vote(&self, target: ProfileId, category: Category) {
            self.breakdowns
                .lock()
                .entry(target)
                .or_default()
                .increment(category);
        }
    }

    #[async_trait]
    impl RatingApi for StubRatings {
        async fn cast_vote(
            &self,
            _voter: ProfileId,
            _target: ProfileId,
            _category: i64,
        ) -> Result<VoteReceipt, RatingError> {
            Err(RatingError::NoOp)
        }

        async fn change_vote(
            &self,
            _voter: ProfileId,
            _target: ProfileId,
            _category: i64,
        ) -> Result<VoteReceipt, RatingError> {
            Err(RatingError::NoOp)
        }

        async fn breakdown(&self, target: ProfileId) -> Result<Breakdown, RatingError> {
            Ok(self
                .breakdowns
                .lock()
                .get(&target)
                .copied()
                .unwrap_or_default())
        }

        async fn totals_for_many(
            &self,
            targets: &[ProfileId],
        ) -> Result<HashMap<ProfileId, u64>, RatingError> {
            let breakdowns = self.breakdowns.lock();
            Ok(targets
                .iter()
                .map(|id| (*id, breakdowns.get(id).map_or(0, |b| b.total())))
                .collect())
        }
    }

    struct Fixture {
        reader: ProfileReader,
        directory: Arc<MockDirectory>,
        ratings: Arc<StubRatings>,
        cache: Arc<InMemoryCache>,
    }

    fn fixture(profiles: usize) -> Fixture {
        let directory = Arc::new(MockDirectory::with_profiles(profiles));
        let ratings = Arc::new(StubRatings::default());
        let cache = Arc::new(InMemoryCache::new());
        let reader = ProfileReader::new(
            directory.clone(),
            ratings.clone(),
            CacheAside::new(cache.clone(), DEFAULT_TTL),
            ReaderConfig::default(),
        );
        Fixture {
            reader,
            directory,
            ratings,
            cache,
        }
    }

    // =========================================================================
    // GetProfile Tests
    // =========================================================================

    #[tokio::test]
    async fn test_get_profile_composes_rating() {
        let f = fixture(1);
        let id = f.directory.ids()[0];
        f.ratings.vote(id, Category::Fair);
        f.ratings.vote(id, Category::Great);

        let snapshot = f.reader.get_profile(id).await.unwrap();
        assert_eq!(snapshot.id, id);
        assert_eq!(snapshot.rating, "awful:0; poor:0; fair:1; good:0; great:1");
        assert_eq!(snapshot.votes, 2);
    }

    #[tokio::test]
    async fn test_get_profile_twice_hits_cache_with_identical_snapshot() {
        let f = fixture(1);
        let id = f.directory.ids()[0];

        let first = f.reader.get_profile(id).await.unwrap();
        let second = f.reader.get_profile(id).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(f.directory.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_profile_missing_is_not_found() {
        let f = fixture(0);
        let result = f.reader.get_profile(ProfileId::new_random()).await;
        assert!(matches!(result, Err(ReadError::NotFound)));
        assert!(f.cache.is_empty());
    }

    #[tokio::test]
    async fn test_get_profile_deleted_is_not_found() {
        let f = fixture(1);
        let id = f.directory.ids()[0];
        f.directory.profiles.lock()[0].state = State::Deleted;

        let result = f.reader.get_profile(id).await;
        assert!(matches!(result, Err(ReadError::NotFound)));
    }

    #[tokio::test]
    async fn test_stale_until_invalidated() {
        let f = fixture(1);
        let id = f.directory.ids()[0];

        let before = f.reader.get_profile(id).await.unwrap();
        f.ratings.vote(id, Category::Good);

        let stale = f.reader.get_profile(id).await.unwrap();
        assert_eq!(stale, before);

        f.reader.invalidate_profile(id).await;
        let fresh = f.reader.get_profile(id).await.unwrap();
        assert_eq!(fresh.votes, 1);
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_reads_through() {
        let f = fixture(1);
        let id = f.directory.ids()[0];
        f.cache
            .set(&CacheKey::profile(id), "{broken".into(), DEFAULT_TTL)
            .await
            .unwrap();

        let snapshot = f.reader.get_profile(id).await.unwrap();
        assert_eq!(snapshot.id, id);
        assert_eq!(f.directory.reads.load(Ordering::SeqCst), 1);
    }

    // =========================================================================
    // GetProfileList Tests
    // =========================================================================

    #[tokio::test]
    async fn test_full_first_page_counts_total() {
        let f = fixture(25);

        let page = f.reader.get_profile_list(Some(1), Some(10)).await.unwrap();
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_items, 25);
        assert_eq!(page.current_page, 1);
        assert_eq!(f.directory.counts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_partial_first_page_skips_count() {
        let f = fixture(7);

        let page = f.reader.get_profile_list(None, None).await.unwrap();
        assert_eq!(page.items.len(), 7);
        assert_eq!(page.total_items, 7);
        assert_eq!(f.directory.counts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_last_page_counts_total() {
        let f = fixture(25);

        let page = f.reader.get_profile_list(Some(3), Some(10)).await.unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total_items, 25);
        assert_eq!(page.current_page, 3);
    }

    #[tokio::test]
    async fn test_list_merges_totals_and_keeps_unrated_rows() {
        let f = fixture(3);
        let ids = f.directory.ids();
        f.ratings.vote(ids[1], Category::Awful);
        f.ratings.vote(ids[1], Category::Good);

        let page = f.reader.get_profile_list(Some(1), Some(10)).await.unwrap();
        assert_eq!(page.items.len(), 3);
        let ratings: Vec<u64> = page.items.iter().map(|p| p.rating).collect();
        assert_eq!(ratings, vec![0, 2, 0]);
    }

    #[tokio::test]
    async fn test_list_is_cached_under_page_key() {
        let f = fixture(12);

        let first = f.reader.get_profile_list(Some(2), Some(5)).await.unwrap();
        assert!(f
            .cache
            .get(&CacheKey::page(5, 5))
            .await
            .unwrap()
            .is_some());

        let second = f.reader.get_profile_list(Some(2), Some(5)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(f.directory.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_list() {
        let f = fixture(0);
        let page = f.reader.get_profile_list(Some(1), Some(10)).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);
    }
}
