//! subkit - moderation helpers on top of a social-platform client
//!
//! Three building blocks, each usable on its own:
//! - Stream filters: lazily skip items that do not match AND/OR predicates
//! - Page updates: transform a wiki page, surviving concurrent edits
//! - Messages: private messages to users and community moderators
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use subkit::filters::{content, redditor, Filterable};
//! use subkit::testing::RecordingClient;
//! use subkit::{Item, Redditor, Submission};
//!
//! let client = Arc::new(RecordingClient::new().with_muted("rust", &["troll"]));
//! let posts: Vec<Item> = vec![
//!     Submission {
//!         id: "a".into(),
//!         score: 50,
//!         subreddit: "rust".into(),
//!         author: Some(Redditor::new("troll")),
//!         ..Default::default()
//!     }
//!     .into(),
//!     Submission {
//!         id: "b".into(),
//!         score: 50,
//!         subreddit: "rust".into(),
//!         author: Some(Redditor::new("ferris")),
//!         ..Default::default()
//!     }
//!     .into(),
//! ];
//!
//! let stream = Filterable::new(posts.into_iter());
//! let muted = stream.cached(client).account_muted().negate();
//! let kept: Vec<Item> = stream
//!     .filter_and(content::content_karma(">", 10)?)
//!     .filter_and(muted)
//!     .filter_and(redditor::account_karma(">=", 0)?)
//!     .collect::<subkit::Result<_>>()?;
//! assert_eq!(kept.len(), 1);
//! # Ok::<(), subkit::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `subkit-core`: item model, comparison symbols, time units, the client
//!   traits the host application implements, configuration and errors
//! - `subkit-filters`: predicates, filter sets and capsules, TTL caches and
//!   the filtered iterator
//! - `subkit-actions`: messaging and the page update loop

pub use subkit_actions::{
    send_message, update_page, update_page_with, MessageExt, UpdateOptions, UpdateReport,
    WikiPageExt,
};
pub use subkit_core::*;

/// Predicate filtering for item streams
pub mod filters {
    pub use subkit_filters::*;
}
