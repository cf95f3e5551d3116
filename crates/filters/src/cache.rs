//! Read-through TTL caches for per-community lookups
//!
//! Some predicates need data that costs a request per community: muted
//! accounts, approved submitters, the community snapshot itself. Those are
//! kept here, keyed by lowercase community name:
//! - miss: fetch, store with the current time
//! - hit older than the TTL: fetch again and replace
//! - otherwise: reuse
//!
//! Nothing else invalidates an entry. The filter prunes every category to its
//! newest entries every few thousand yields (see [`FilterCaches::evict`]).

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use subkit_core::config::DEFAULT_COMMUNITY_TTL_SECS;
use subkit_core::{Result, Subreddit, Timestamp};
use tracing::debug;

/// One cached value and when it was captured
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    /// Capture time
    pub captured_at: Timestamp,
    /// Cached value
    pub value: V,
}

impl<V> CacheEntry<V> {
    /// Whether the entry is older than `ttl` at `now`
    pub fn is_stale(&self, ttl: Duration, now: Timestamp) -> bool {
        match now.duration_since(self.captured_at) {
            Some(age) => age > ttl,
            None => false,
        }
    }
}

/// Read-through cache for one category
#[derive(Debug, Clone)]
pub struct TtlCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        TtlCache {
            entries: HashMap::new(),
        }
    }
}

impl<V> TtlCache<V> {
    /// Empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key`, fetching it when missing or stale
    ///
    /// A failed fetch leaves any previous entry in place.
    pub fn get_or_fetch<F>(&mut self, key: &str, ttl: Duration, now: Timestamp, fetch: F) -> Result<&V>
    where
        F: FnOnce() -> Result<V>,
    {
        let key = key.to_ascii_lowercase();
        let fresh = self
            .entries
            .get(&key)
            .map_or(false, |entry| !entry.is_stale(ttl, now));
        if !fresh {
            debug!(target: "subkit::filter", key = %key, "Fetching cache entry");
            let value = fetch()?;
            self.entries.insert(
                key.clone(),
                CacheEntry {
                    captured_at: now,
                    value,
                },
            );
        }
        // Present: either fresh or just inserted
        Ok(&self.entries[&key].value)
    }

    /// Entry for `key` without fetching
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(&key.to_ascii_lowercase())
    }

    /// Keep the `keep` most recently captured entries, returning how many were dropped
    pub fn retain_newest(&mut self, keep: usize) -> usize {
        if self.entries.len() <= keep {
            return 0;
        }
        let mut by_age: Vec<(Timestamp, String)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.captured_at, key.clone()))
            .collect();
        // Newest first; ties broken by key so the outcome does not depend on hashing
        by_age.sort_unstable_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        let dropped = by_age.len() - keep;
        for (_, key) in by_age.into_iter().skip(keep) {
            self.entries.remove(&key);
        }
        dropped
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Membership list categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Membership {
    /// Accounts muted in a community
    Muted,
    /// Approved submitters of a community
    ApprovedSubmitter,
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Membership::Muted => "muted",
            Membership::ApprovedSubmitter => "approved_submitter",
        })
    }
}

/// Every cache a filter owns
#[derive(Debug, Clone)]
pub struct FilterCaches {
    muted: TtlCache<Vec<String>>,
    approved_submitters: TtlCache<Vec<String>>,
    communities: TtlCache<Subreddit>,
    community_ttl: Duration,
    retention: usize,
}

/// Handle shared between a filter and the predicates it runs
pub type SharedCaches = Arc<Mutex<FilterCaches>>;

impl FilterCaches {
    /// Empty caches keeping `retention` entries per category when pruned
    pub fn new(retention: usize) -> Self {
        FilterCaches {
            muted: TtlCache::new(),
            approved_submitters: TtlCache::new(),
            communities: TtlCache::new(),
            community_ttl: Duration::from_secs(DEFAULT_COMMUNITY_TTL_SECS),
            retention,
        }
    }

    /// Same, with a community snapshot TTL
    pub fn with_community_ttl(retention: usize, community_ttl: Duration) -> Self {
        FilterCaches {
            community_ttl,
            ..Self::new(retention)
        }
    }

    /// Wrap in a shareable handle
    pub fn into_shared(self) -> SharedCaches {
        Arc::new(Mutex::new(self))
    }

    /// How long community snapshots stay fresh
    pub fn community_ttl(&self) -> Duration {
        self.community_ttl
    }

    /// Change the community snapshot TTL; applies to existing entries too
    pub fn set_community_ttl(&mut self, ttl: Duration) {
        self.community_ttl = ttl;
    }

    /// Entries kept per category by [`evict`](Self::evict)
    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Membership list cache of one category
    pub fn membership(&mut self, kind: Membership) -> &mut TtlCache<Vec<String>> {
        match kind {
            Membership::Muted => &mut self.muted,
            Membership::ApprovedSubmitter => &mut self.approved_submitters,
        }
    }

    /// Read-only view of a membership cache
    pub fn membership_ref(&self, kind: Membership) -> &TtlCache<Vec<String>> {
        match kind {
            Membership::Muted => &self.muted,
            Membership::ApprovedSubmitter => &self.approved_submitters,
        }
    }

    /// Community snapshot cache
    pub fn communities(&mut self) -> &mut TtlCache<Subreddit> {
        &mut self.communities
    }

    /// Read-only view of the community snapshot cache
    pub fn communities_ref(&self) -> &TtlCache<Subreddit> {
        &self.communities
    }

    /// Trim every category to the retention size, newest entries first
    pub fn evict(&mut self) -> usize {
        let keep = self.retention;
        let muted = self.muted.retain_newest(keep);
        let approved = self.approved_submitters.retain_newest(keep);
        let communities = self.communities.retain_newest(keep);
        debug!(
            target: "subkit::filter",
            keep,
            muted,
            approved,
            communities,
            "Evicted cache entries"
        );
        muted + approved + communities
    }
}
