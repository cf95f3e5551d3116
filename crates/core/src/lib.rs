//! Core types and traits for subkit
//!
//! This crate defines the vocabulary shared by the filter and action crates:
//! - Item model: `Item`, `Submission`, `Comment`, `Redditor`, `Subreddit`
//! - FieldValue: dynamically looked-up attribute values
//! - Comparison: the six comparison symbols
//! - TimeUnit / get_seconds: the time unit table
//! - Timestamp / Clock: time for ages and cache TTLs
//! - Collaborator traits: `PlatformClient`, `WikiPage`
//! - SubkitConfig: `subkit.toml`
//! - Error: the error type of every subkit crate

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod comparison;
pub mod config;
pub mod error;
pub mod item;
pub mod testing;
pub mod timestamp;
pub mod units;
pub mod value;

pub use client::{
    ComposeRequest, Destination, EditConflict, EditRequest, PlatformClient, WikiPage,
    WikiRevision, COMMUNITY_PREFIX,
};
pub use comparison::Comparison;
pub use config::{FilterConfig, SubkitConfig, UpdateConfig, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use item::{
    AttributeScope, Award, Awards, Comment, Item, ItemKind, Redditor, Submission, Subreddit,
};
pub use timestamp::{Clock, ManualClock, SystemClock, Timestamp};
pub use units::{get_seconds, TimeUnit};
pub use value::FieldValue;
