//! Cache behavior of a running filter
//!
//! Covers the read-through TTL policy as seen through a stream, and the
//! periodic pruning that keeps long-running streams bounded:
//! - one fetch per community per TTL, shared by every predicate
//! - pruning on the configured yield count, keeping the newest entries
//! - manual pruning with `clean_cache`

use std::sync::Arc;
use subkit_core::testing::{Fetch, RecordingClient};
use subkit_core::{FilterConfig, Item, ManualClock, Redditor, Submission, Subreddit, Timestamp};
use subkit_filters::{Filterable, Membership};

// ============================================================================
// Test Helpers
// ============================================================================

fn community(i: usize) -> String {
    format!("sub{}", i)
}

fn post(i: usize, subreddit: &str) -> Item {
    Submission {
        id: format!("p{}", i),
        subreddit: subreddit.to_string(),
        author: Some(Redditor::new(format!("user{}", i % 7))),
        ..Default::default()
    }
    .into()
}

/// One post in each of `n` communities
fn spread_posts(n: usize) -> Vec<Item> {
    (0..n).map(|i| post(i, &community(i))).collect()
}

fn client_with_communities(n: usize) -> Arc<RecordingClient> {
    let client = RecordingClient::new();
    for i in 0..n {
        client.put_subreddit(Subreddit {
            display_name: community(i),
            subscribers: i as u64,
            ..Default::default()
        });
    }
    Arc::new(client)
}

fn clock() -> ManualClock {
    ManualClock::new(Timestamp::from_secs(1_000_000))
}

// ============================================================================
// Read-through caching
// ============================================================================

#[test]
fn predicates_share_one_fetch_per_community() {
    let client = client_with_communities(3);
    let clock = clock();
    let posts: Vec<Item> = (0..30).map(|i| post(i, &community(i % 3))).collect();

    let stream = Filterable::new(posts.into_iter()).with_clock(Arc::new(clock.clone()));
    let cached = stream.cached(client.clone());
    let out: Vec<Item> = stream
        .filter_and(cached.subreddit_nsfw(true))
        .filter_and(cached.subreddit_subscribers(">=", 0).unwrap())
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(out.len(), 30);
    assert_eq!(client.total_fetches(Fetch::Subreddit), 3);
}

#[test]
fn stale_entries_are_refetched() {
    let client = client_with_communities(1);
    let clock = clock();
    let ticking = clock.clone();
    let posts: Vec<Item> = (0..10).map(|i| post(i, "sub0")).collect();
    // Half an hour between posts: the hour-long snapshot TTL expires every third post
    let source = posts.into_iter().inspect(move |_| ticking.advance_secs(1_800));

    let stream = Filterable::new(source).with_clock(Arc::new(clock.clone()));
    let cached = stream.cached(client.clone());
    let count = stream.filter_and(cached.subreddit_nsfw(true)).count();

    assert_eq!(count, 10);
    // Captured at posts 0, 3, 6 and 9
    assert_eq!(client.fetch_count(Fetch::Subreddit, "sub0"), 4);
}

#[test]
fn membership_lists_are_cached_per_community() {
    let client = Arc::new(
        RecordingClient::new()
            .with_muted("sub0", &["user1", "user2"])
            .with_contributors("sub0", &["user3"]),
    );
    let posts: Vec<Item> = (0..14).map(|i| post(i, "sub0")).collect();

    let stream = Filterable::new(posts.into_iter()).with_clock(Arc::new(clock()));
    let cached = stream.cached(client.clone());
    let out: Vec<Item> = stream
        .filter_or(cached.account_muted())
        .filter_or(cached.account_approved_submitter())
        .collect::<Result<_, _>>()
        .unwrap();

    // user1, user2 and user3 each wrote two of the fourteen posts
    assert_eq!(out.len(), 6);
    assert_eq!(client.fetch_count(Fetch::Muted, "sub0"), 1);
    assert_eq!(client.fetch_count(Fetch::Contributors, "sub0"), 1);
}

// ============================================================================
// Periodic eviction
// ============================================================================

#[test]
fn eviction_runs_on_the_2000th_yield_and_keeps_the_newest_1000() {
    let n = 2_500;
    let client = client_with_communities(n);
    let clock = clock();
    let ticking = clock.clone();
    let source = spread_posts(n).into_iter().inspect(move |_| ticking.advance_secs(1));

    let stream = Filterable::new(source).with_clock(Arc::new(clock.clone()));
    let caches = stream.caches();
    let cached = stream.cached(client.clone());
    let mut stream = stream.filter_and(cached.subreddit_nsfw(true));

    for _ in 0..1_999 {
        stream.next().unwrap().unwrap();
    }
    assert_eq!(caches.lock().communities_ref().len(), 1_999);

    stream.next().unwrap().unwrap();
    {
        let caches = caches.lock();
        let communities = caches.communities_ref();
        assert_eq!(communities.len(), 1_000);
        assert!(communities.peek(&community(999)).is_none());
        assert!(communities.peek(&community(1_000)).is_some());
        assert!(communities.peek(&community(1_999)).is_some());
    }

    let rest = stream.by_ref().count();
    assert_eq!(rest, 500);
    assert_eq!(stream.yielded(), 2_500);
    assert_eq!(caches.lock().communities_ref().len(), 1_500);
}

#[test]
fn nothing_is_pruned_without_yields() {
    let n = 12;
    let client = client_with_communities(n);
    let clock = clock();
    let ticking = clock.clone();
    let source = spread_posts(n).into_iter().inspect(move |_| ticking.advance_secs(1));
    let config = FilterConfig {
        cache_items: 2,
        eviction_interval: 5,
        ..FilterConfig::default()
    };

    let stream = Filterable::with_config(source, &config).unwrap().with_clock(Arc::new(clock.clone()));
    let caches = stream.caches();
    let cached = stream.cached(client.clone());
    let stream = stream
        .filter_and(cached.subreddit_nsfw(true))
        .filter_and(cached.account_muted());

    // Nobody is muted, so nothing is yielded and nothing is pruned
    assert_eq!(stream.count(), 0);
    assert_eq!(caches.lock().communities_ref().len(), n);
    assert_eq!(caches.lock().membership_ref(Membership::Muted).len(), n);
}

#[test]
fn eviction_interval_and_size_come_from_config() {
    let n = 12;
    let client = client_with_communities(n);
    let clock = clock();
    let ticking = clock.clone();
    let source = spread_posts(n).into_iter().inspect(move |_| ticking.advance_secs(1));
    let config = FilterConfig {
        cache_items: 2,
        eviction_interval: 5,
        ..FilterConfig::default()
    };

    let stream = Filterable::with_config(source, &config).unwrap().with_clock(Arc::new(clock.clone()));
    let caches = stream.caches();
    let cached = stream.cached(client.clone());
    let mut stream = stream.filter_and(cached.subreddit_nsfw(true));

    // Pruned after the 5th and 10th yields
    assert_eq!(stream.by_ref().count(), n);
    let caches = caches.lock();
    let communities = caches.communities_ref();
    assert_eq!(communities.len(), 4);
    for i in [8, 9, 10, 11] {
        assert!(communities.peek(&community(i)).is_some(), "sub{} kept", i);
    }
}

#[test]
fn clean_cache_prunes_on_demand() {
    let n = 10;
    let client = client_with_communities(n);
    let clock = clock();
    let ticking = clock.clone();
    let source = spread_posts(n).into_iter().inspect(move |_| ticking.advance_secs(1));

    let stream = Filterable::with_cache_items(source, 3).with_clock(Arc::new(clock.clone()));
    let cached = stream.cached(client.clone());
    let mut stream = stream.filter_and(cached.subreddit_nsfw(true));
    assert_eq!(stream.by_ref().count(), n);

    assert_eq!(stream.clean_cache(), 7);
    assert_eq!(stream.caches().lock().communities_ref().len(), 3);
    assert_eq!(stream.clean_cache(), 0);
}

#[test]
fn subreddit_cache_ttl_is_adjustable() {
    let client = client_with_communities(1);
    let clock = clock();
    let ticking = clock.clone();
    let posts: Vec<Item> = (0..4).map(|i| post(i, "sub0")).collect();
    let source = posts.into_iter().inspect(move |_| ticking.advance_secs(60));

    let stream = Filterable::new(source).with_clock(Arc::new(clock.clone()));
    stream.set_subreddit_cache(30);
    let cached = stream.cached(client.clone());
    let count = stream.filter_and(cached.subreddit_nsfw(true)).count();

    assert_eq!(count, 4);
    assert_eq!(client.fetch_count(Fetch::Subreddit, "sub0"), 4);
}
