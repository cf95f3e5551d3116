//! Lazily filtered streams
//!
//! [`Filterable`] wraps any iterator and yields only the items that pass its
//! AND/OR predicate lists. Pulling from it pulls from the source until a
//! match turns up, so an infinite stream with no matches blocks exactly as
//! long as the source does.
//!
//! ```
//! use subkit_filters::{content, redditor, Filterable};
//! use subkit_core::{Item, Submission};
//!
//! let posts: Vec<Item> = vec![
//!     Submission { id: "a".into(), score: 3, ..Default::default() }.into(),
//!     Submission { id: "b".into(), score: 40, ..Default::default() }.into(),
//! ];
//! let popular: Vec<Item> = Filterable::new(posts.into_iter())
//!     .filter_and(content::content_karma(">=", 10).unwrap())
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(popular.len(), 1);
//! ```

use crate::cache::{FilterCaches, Membership, SharedCaches};
use crate::capsule::FilterCapsule;
use crate::predicate::{FilterKind, Predicate};
use crate::set::FilterSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use subkit_core::{
    Clock, FilterConfig, Item, PlatformClient, Result, Subreddit, SystemClock,
};
use tracing::debug;

/// An iterator yielding only the items that pass its filters
///
/// Items that fail are consumed and skipped. A predicate error is yielded as
/// `Some(Err(..))` and the offending item is dropped; iteration can continue.
pub struct Filterable<I, T = Item> {
    source: I,
    filters: FilterSet<T>,
    caches: SharedCaches,
    clock: Arc<dyn Clock>,
    eviction_interval: u64,
    membership_ttl: Duration,
    since_eviction: u64,
    yielded: u64,
}

impl<I, T> Filterable<I, T>
where
    I: Iterator<Item = T>,
    T: 'static,
{
    /// Wrap `source` with default settings
    pub fn new(source: I) -> Self {
        Self::from_valid_config(source, &FilterConfig::default())
    }

    /// Wrap `source`, keeping `cache_items` entries per cache category
    pub fn with_cache_items(source: I, cache_items: usize) -> Self {
        let config = FilterConfig {
            cache_items,
            ..FilterConfig::default()
        };
        Self::from_valid_config(source, &config)
    }

    /// Wrap `source` using `[filters]` settings
    ///
    /// # Errors
    ///
    /// Rejects the same settings as [`FilterConfig::validate`], such as an
    /// eviction interval of zero.
    pub fn with_config(source: I, config: &FilterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(source, config))
    }

    fn from_valid_config(source: I, config: &FilterConfig) -> Self {
        let caches = FilterCaches::with_community_ttl(
            config.cache_items,
            Duration::from_secs(config.community_ttl_secs),
        );
        Filterable {
            source,
            filters: FilterSet::new(),
            caches: caches.into_shared(),
            clock: Arc::new(SystemClock),
            eviction_interval: config.eviction_interval,
            membership_ttl: Duration::from_secs(config.membership_ttl_secs),
            since_eviction: 0,
            yielded: 0,
        }
    }

    /// Use `clock` for cache timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Add a predicate to the list named by `kind` (`"and"` / `"or"`, any case)
    pub fn filter(mut self, kind: &str, predicate: impl Into<Predicate<T>>) -> Result<Self> {
        let kind: FilterKind = kind.parse()?;
        self.push(kind, predicate);
        Ok(self)
    }

    /// Add an AND predicate
    pub fn filter_and(mut self, predicate: impl Into<Predicate<T>>) -> Self {
        self.push(FilterKind::And, predicate);
        self
    }

    /// Add an OR predicate
    pub fn filter_or(mut self, predicate: impl Into<Predicate<T>>) -> Self {
        self.push(FilterKind::Or, predicate);
        self
    }

    /// Add a predicate without giving up ownership of the filter
    pub fn push(&mut self, kind: FilterKind, predicate: impl Into<Predicate<T>>) {
        self.filters.push(kind, predicate.into());
    }

    /// A fresh, empty capsule for building nested rules
    pub fn capsule(&self) -> FilterCapsule<T> {
        FilterCapsule::new()
    }
}

impl<I, T> Filterable<I, T> {
    /// AND predicates
    pub fn and_filters(&self) -> &[Predicate<T>] {
        self.filters.and_filters()
    }

    /// OR predicates
    pub fn or_filters(&self) -> &[Predicate<T>] {
        self.filters.or_filters()
    }

    /// Number of predicates in both lists
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// No predicates: every item passes
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Items yielded so far
    pub fn yielded(&self) -> u64 {
        self.yielded
    }

    /// The caches shared with this filter's cached predicates
    pub fn caches(&self) -> SharedCaches {
        Arc::clone(&self.caches)
    }

    /// Prune every cache category to its newest entries now
    ///
    /// Runs automatically every `eviction_interval` yields.
    pub fn clean_cache(&self) -> usize {
        self.caches.lock().evict()
    }

    /// Change how long community snapshots stay fresh, in seconds
    ///
    /// Applies to predicates already added.
    pub fn set_subreddit_cache(&self, ttl_secs: u64) {
        self.caches
            .lock()
            .set_community_ttl(Duration::from_secs(ttl_secs));
    }

    fn record_yield(&mut self) {
        self.yielded += 1;
        self.since_eviction += 1;
        if self.since_eviction >= self.eviction_interval {
            let dropped = self.clean_cache();
            debug!(
                target: "subkit::filter",
                yielded = self.yielded,
                dropped,
                "Periodic cache eviction"
            );
            self.since_eviction = 0;
        }
    }
}

impl<I> Filterable<I, Item> {
    /// Factory for predicates backed by this filter's caches
    ///
    /// Lookups go through `client` and are stamped with this filter's clock.
    pub fn cached(&self, client: Arc<dyn PlatformClient>) -> CachedFilters {
        CachedFilters {
            client,
            caches: Arc::clone(&self.caches),
            clock: Arc::clone(&self.clock),
            membership_ttl: self.membership_ttl,
        }
    }
}

impl<I, T> Iterator for Filterable<I, T>
where
    I: Iterator<Item = T>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = self.source.next()?;
            match self.filters.matches(&item) {
                Ok(true) => {
                    self.record_yield();
                    return Some(Ok(item));
                }
                Ok(false) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl<I, T> fmt::Display for Filterable<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Filterable with {} AND filters & {} OR filters>",
            self.filters.and_filters().len(),
            self.filters.or_filters().len()
        )
    }
}

impl<I, T> fmt::Debug for Filterable<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filterable")
            .field("and_filters", &self.filters.and_filters().len())
            .field("or_filters", &self.filters.or_filters().len())
            .field("yielded", &self.yielded)
            .field("eviction_interval", &self.eviction_interval)
            .finish()
    }
}

// ============================================================================
// Cache-backed predicates
// ============================================================================

/// Builds predicates that consult a filter's caches
///
/// Obtained from [`Filterable::cached`]. The predicate factories live in the
/// [`redditor`](crate::redditor) and [`subreddit`](crate::subreddit) modules.
#[derive(Clone)]
pub struct CachedFilters {
    client: Arc<dyn PlatformClient>,
    caches: SharedCaches,
    clock: Arc<dyn Clock>,
    membership_ttl: Duration,
}

impl CachedFilters {
    /// Build directly from parts, for predicates used outside a [`Filterable`]
    pub fn new(client: Arc<dyn PlatformClient>, caches: SharedCaches, clock: Arc<dyn Clock>) -> Self {
        CachedFilters {
            client,
            caches,
            clock,
            membership_ttl: Duration::from_secs(subkit_core::config::DEFAULT_MEMBERSHIP_TTL_SECS),
        }
    }

    /// Default TTL for membership predicates built from here on
    pub fn membership_ttl(&self) -> Duration {
        self.membership_ttl
    }

    /// The caches these predicates read and fill
    pub fn caches(&self) -> SharedCaches {
        Arc::clone(&self.caches)
    }

    pub(crate) fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Snapshot of the item's community, through the community cache
    pub(crate) fn community(&self, item: &Item) -> Result<Subreddit> {
        let name = item.community_name()?;
        let now = self.clock.now();
        let mut caches = self.caches.lock();
        let ttl = caches.community_ttl();
        let client = &self.client;
        caches
            .communities()
            .get_or_fetch(name, ttl, now, || client.subreddit(name))
            .cloned()
    }

    /// Whether the item's author is on a membership list of its community
    ///
    /// Deleted authors are never members.
    pub(crate) fn is_member(&self, kind: Membership, ttl: Duration, item: &Item) -> Result<bool> {
        let name = item.community_name()?;
        let Some(author) = item.author()? else {
            return Ok(false);
        };
        let now = self.clock.now();
        let client = &self.client;
        let mut caches = self.caches.lock();
        let members = caches.membership(kind).get_or_fetch(name, ttl, now, || match kind {
            Membership::Muted => client.muted(name),
            Membership::ApprovedSubmitter => client.contributors(name),
        })?;
        Ok(members.iter().any(|member| author.is_named(member)))
    }
}

impl fmt::Debug for CachedFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedFilters")
            .field("membership_ttl", &self.membership_ttl)
            .finish()
    }
}
