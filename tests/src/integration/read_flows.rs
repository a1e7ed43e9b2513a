//! # Read Flows
//!
//! Profile reader over the in-memory store and cache: snapshot composition,
//! staleness until invalidation, and degraded operation when the cache or
//! the ledger is down.

use super::fixtures::{t0, DownCache, ReadOnlyLedger, World};
use std::sync::Arc;
use ur_01_profile_cache::InMemoryCache;
use ur_02_rating_engine::{RatingApi, RatingError};
use ur_03_profile_reader::ReadError;
use ur_04_profile_store::{AccountStore, InMemoryStore};

// =============================================================================
// Snapshots
// =============================================================================

#[tokio::test]
async fn test_miss_then_hit_returns_identical_snapshot() {
    let world = World::new();
    let voter = world.seed("voter").await;
    let target = world.seed("target").await;
    world.ratings.cast_vote(voter, target, 4).await.unwrap();

    let first = world.reader.get_profile(target).await.unwrap();
    let second = world.reader.get_profile(target).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.votes, 1);
    assert_eq!(first.rating, "awful:0; poor:0; fair:0; good:1; great:0");
}

#[tokio::test]
async fn test_snapshot_stale_until_invalidated() {
    let world = World::new();
    let voter = world.seed("voter").await;
    let target = world.seed("target").await;

    assert_eq!(world.reader.get_profile(target).await.unwrap().votes, 0);

    world.ratings.cast_vote(voter, target, 5).await.unwrap();
    assert_eq!(world.reader.get_profile(target).await.unwrap().votes, 0);

    world.reader.invalidate_profile(target).await;
    let fresh = world.reader.get_profile(target).await.unwrap();
    assert_eq!(fresh.votes, 1);
    assert!(fresh.rating.contains("great:1"));
}

#[tokio::test]
async fn test_deleted_profile_is_not_found() {
    let world = World::new();
    let target = world.seed("target").await;
    world.store.delete_profile(target, t0()).await.unwrap();

    assert!(matches!(
        world.reader.get_profile(target).await,
        Err(ReadError::NotFound)
    ));
}

#[tokio::test]
async fn test_unknown_profile_is_not_found() {
    let world = World::new();
    assert!(matches!(
        world.reader.get_profile(shared_types::ProfileId::new_random()).await,
        Err(ReadError::NotFound)
    ));
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_list_merges_totals_with_zero_for_unrated() {
    let world = World::new();
    let a = world.seed("alice").await;
    let b = world.seed("bob").await;
    let c = world.seed("carol").await;
    world.ratings.cast_vote(a, b, 2).await.unwrap();

    let page = world.reader.get_profile_list(None, None).await.unwrap();
    assert_eq!(page.current_page, 1);
    assert_eq!(page.total_items, 3);

    let rating_of = |id| {
        page.items
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.rating)
            .unwrap()
    };
    assert_eq!(rating_of(a), 0);
    assert_eq!(rating_of(b), 1);
    assert_eq!(rating_of(c), 0);
}

#[tokio::test]
async fn test_list_pages_are_cached_within_ttl() {
    let world = World::new();
    let a = world.seed("alice").await;
    let b = world.seed("bob").await;

    let before = world.reader.get_profile_list(Some(1), Some(10)).await.unwrap();
    world.ratings.cast_vote(a, b, 3).await.unwrap();
    world.seed("carol").await;
    let after = world.reader.get_profile_list(Some(1), Some(10)).await.unwrap();

    assert_eq!(before, after);
    assert_eq!(after.items.len(), 2);

    // A different page size is a different key.
    let other = world.reader.get_profile_list(Some(1), Some(5)).await.unwrap();
    assert_eq!(other.items.len(), 3);
}

#[tokio::test]
async fn test_list_page_beyond_end_is_empty_with_total() {
    let world = World::new();
    world.seed("alice").await;
    world.seed("bob").await;

    let page = world.reader.get_profile_list(Some(3), Some(2)).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.current_page, 3);
    assert_eq!(page.total_items, 2);
}

// =============================================================================
// Degraded backends
// =============================================================================

#[tokio::test]
async fn test_reads_succeed_with_cache_down() {
    let world = World::with_cache(Arc::new(DownCache));
    let voter = world.seed("voter").await;
    let target = world.seed("target").await;
    world.ratings.cast_vote(voter, target, 1).await.unwrap();

    // Every read goes through to the store, so nothing is stale.
    let snapshot = world.reader.get_profile(target).await.unwrap();
    assert_eq!(snapshot.votes, 1);
    world.ratings.change_vote(voter, target, 2).await.unwrap();
    let snapshot = world.reader.get_profile(target).await.unwrap();
    assert!(snapshot.rating.contains("poor:1"));

    let page = world.reader.get_profile_list(None, None).await.unwrap();
    assert_eq!(page.total_items, 2);

    // Invalidation failures are swallowed.
    world.reader.invalidate_profile(target).await;
}

#[tokio::test]
async fn test_failed_vote_write_changes_nothing() {
    let store = Arc::new(InMemoryStore::new());
    let ledger = Arc::new(ReadOnlyLedger {
        inner: store.clone(),
    });
    let world = World::assemble(store, ledger, Arc::new(InMemoryCache::new()));
    let voter = world.seed("voter").await;
    let target = world.seed("target").await;

    let err = world.ratings.cast_vote(voter, target, 3).await.unwrap_err();
    assert!(matches!(err, RatingError::StoreUnavailable(_)));

    assert_eq!(world.store.vote_count(), 0);
    let snapshot = world.reader.get_profile(target).await.unwrap();
    assert_eq!(snapshot.votes, 0);
    assert_eq!(snapshot.rating, "awful:0; poor:0; fair:0; good:0; great:0");
}
