//! # Rating Flows
//!
//! Rating engine over the in-memory store: counters, cooldown and concurrent
//! casts. The store serializes every ledger call, so these flows check the
//! outcome of real races between the engine's pre-checks and the ledger.

use super::fixtures::{seed_profile, t0, World};
use chrono::Duration;
use shared_types::Category;
use std::sync::Arc;
use ur_02_rating_engine::{RatingApi, RatingEngine, RatingError, RatingPolicy};
use ur_04_profile_store::InMemoryStore;

// =============================================================================
// Counters
// =============================================================================

#[tokio::test]
async fn test_breakdown_matches_live_votes() {
    let world = World::new();
    let target = world.seed("target").await;
    let mut voters = Vec::new();
    for i in 0..5 {
        voters.push(world.seed(&format!("voter{}", i)).await);
    }

    for (voter, category) in voters.iter().zip([1, 2, 2, 5, 5]) {
        world
            .ratings
            .cast_vote(*voter, target, category)
            .await
            .unwrap();
    }
    // voter0 moves from awful to great
    world.ratings.change_vote(voters[0], target, 5).await.unwrap();

    let breakdown = world.ratings.breakdown(target).await.unwrap();
    assert_eq!(breakdown.count(Category::Awful), 0);
    assert_eq!(breakdown.count(Category::Poor), 2);
    assert_eq!(breakdown.count(Category::Great), 3);
    assert_eq!(breakdown.total(), 5);
    assert_eq!(world.store.vote_count(), 5);

    let totals = world.ratings.totals_for_many(&[target]).await.unwrap();
    assert_eq!(totals[&target], 5);
}

#[tokio::test]
async fn test_totals_for_many_zero_fills() {
    let world = World::new();
    let voter = world.seed("voter").await;
    let rated = world.seed("rated").await;
    let unrated = world.seed("unrated").await;
    world.ratings.cast_vote(voter, rated, 3).await.unwrap();

    let totals = world
        .ratings
        .totals_for_many(&[rated, unrated, rated])
        .await
        .unwrap();
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[&rated], 1);
    assert_eq!(totals[&unrated], 0);
}

// =============================================================================
// Cooldown
// =============================================================================

#[tokio::test]
async fn test_cooldown_boundary() {
    let world = World::new();
    let voter = world.seed("voter").await;
    let first = world.seed("first").await;
    let second = world.seed("second").await;

    world.ratings.cast_vote(voter, first, 4).await.unwrap();

    world
        .clock
        .advance(Duration::hours(1) - Duration::seconds(1));
    let err = world.ratings.cast_vote(voter, second, 4).await.unwrap_err();
    match err {
        RatingError::RateLimited { retry_at } => assert_eq!(retry_at, t0() + Duration::hours(1)),
        other => panic!("expected RateLimited, got {:?}", other),
    }

    world.clock.advance(Duration::seconds(1));
    world.ratings.cast_vote(voter, second, 4).await.unwrap();
}

#[tokio::test]
async fn test_change_is_not_rate_limited_but_restarts_cooldown() {
    let world = World::new();
    let voter = world.seed("voter").await;
    let first = world.seed("first").await;
    let second = world.seed("second").await;

    world.ratings.cast_vote(voter, first, 2).await.unwrap();
    world.clock.advance(Duration::minutes(10));
    let receipt = world.ratings.change_vote(voter, first, 4).await.unwrap();
    assert_eq!(receipt.previous, Some(Category::Poor));

    // An hour after the cast, but not after the change.
    world.clock.advance(Duration::minutes(50));
    assert!(matches!(
        world.ratings.cast_vote(voter, second, 4).await,
        Err(RatingError::RateLimited { .. })
    ));

    world.clock.advance(Duration::minutes(10));
    world.ratings.cast_vote(voter, second, 4).await.unwrap();
}

#[tokio::test]
async fn test_deleted_target_cannot_be_rated() {
    use ur_04_profile_store::AccountStore;

    let world = World::new();
    let voter = world.seed("voter").await;
    let target = world.seed("target").await;
    world.store.delete_profile(target, t0()).await.unwrap();

    assert!(matches!(
        world.ratings.cast_vote(voter, target, 3).await,
        Err(RatingError::UnknownTarget)
    ));
    assert_eq!(world.store.vote_count(), 0);
}

// =============================================================================
// Concurrency
// =============================================================================

fn shared_engine(store: &Arc<InMemoryStore>) -> Arc<RatingEngine> {
    let clock = Arc::new(shared_types::MockClock::new(t0()));
    Arc::new(RatingEngine::new(
        store.clone(),
        clock,
        RatingPolicy::default(),
    ))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_casts_record_one_vote() {
    let store = Arc::new(InMemoryStore::new());
    let voter = seed_profile(&store, "voter", t0()).await;
    let target = seed_profile(&store, "target", t0()).await;
    let engine = shared_engine(&store);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.cast_vote(voter, target, 3).await })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(RatingError::AlreadyVoted) | Err(RatingError::RateLimited { .. }) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(store.vote_count(), 1);
    assert_eq!(engine.breakdown(target).await.unwrap().total(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_casts_to_many_targets_respect_cooldown() {
    let store = Arc::new(InMemoryStore::new());
    let voter = seed_profile(&store, "voter", t0()).await;
    let mut targets = Vec::new();
    for i in 0..8 {
        targets.push(seed_profile(&store, &format!("target{}", i), t0()).await);
    }
    let engine = shared_engine(&store);

    let handles: Vec<_> = targets
        .iter()
        .map(|target| {
            let engine = engine.clone();
            let target = *target;
            tokio::spawn(async move { engine.cast_vote(voter, target, 5).await })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(RatingError::RateLimited { .. }) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(store.vote_count(), 1);
    let totals = engine.totals_for_many(&targets).await.unwrap();
    assert_eq!(totals.values().sum::<u64>(), 1);
}
