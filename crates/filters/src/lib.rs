//! Predicate filtering for item streams
//!
//! A [`Filterable`] wraps an iterator and yields only items that pass:
//! - every AND predicate, and
//! - at least one OR predicate, when any are present.
//!
//! Predicates are plain closures wrapped in [`Predicate`]. Groups of them can
//! be nested with [`FilterCapsule`]. The factory modules build the common
//! ones:
//! - [`redditor`]: account name, karma, age, mute and approval status
//! - [`subreddit`]: community name and snapshot attributes
//! - [`content`]: thread position, score, awards, lengths, media type
//!
//! Lookups that cost a request (community snapshots, muted lists, approved
//! submitters) go through the filter's TTL caches via [`CachedFilters`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod base;
pub mod cache;
pub mod capsule;
pub mod content;
pub mod filterable;
pub mod predicate;
pub mod redditor;
pub mod set;
pub mod subreddit;

pub use cache::{CacheEntry, FilterCaches, Membership, SharedCaches, TtlCache};
pub use capsule::FilterCapsule;
pub use content::AwardThresholds;
pub use filterable::{CachedFilters, Filterable};
pub use predicate::{FilterKind, Predicate};
pub use set::FilterSet;
pub use subkit_core::{Error, Result};
