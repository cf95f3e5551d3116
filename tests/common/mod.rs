//! Shared test utilities for the integration test suites.
//!
//! Import via `mod common;` from any test file.

#![allow(dead_code)]

use std::sync::Arc;
pub use subkit::testing::{Fetch, RecordingClient, ScriptedWikiPage};
pub use subkit::{Comment, Item, ManualClock, Redditor, Submission, Subreddit, Timestamp};

// ============================================================================
// Time
// ============================================================================

/// Fixed "now" for every suite: 2024-01-01T00:00:00Z
pub const NOW_SECS: u64 = 1_704_067_200;

pub const DAY: f64 = 86_400.0;

/// Manual clock starting at [`NOW_SECS`]
pub fn clock() -> ManualClock {
    ManualClock::new(Timestamp::from_secs(NOW_SECS))
}

/// Creation time `days` before [`NOW_SECS`]
pub fn days_ago(days: f64) -> f64 {
    NOW_SECS as f64 - days * DAY
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn account(name: &str, link_karma: i64, comment_karma: i64, age_days: f64) -> Redditor {
    Redditor {
        name: name.to_string(),
        link_karma,
        comment_karma,
        created_utc: days_ago(age_days),
        ..Default::default()
    }
}

pub fn community(name: &str, subscribers: u64, over18: bool) -> Subreddit {
    Subreddit {
        display_name: name.to_string(),
        subscribers,
        over18,
        created_utc: days_ago(3_000.0),
        ..Default::default()
    }
}

pub fn submission(id: &str, subreddit: &str, author: Option<Redditor>, score: i64) -> Submission {
    Submission {
        id: id.to_string(),
        title: format!("Post {}", id),
        subreddit: subreddit.to_string(),
        author,
        score,
        created_utc: days_ago(0.5),
        ..Default::default()
    }
}

pub fn comment(id: &str, parent: &Submission, author: Option<Redditor>, body: &str) -> Comment {
    Comment {
        id: id.to_string(),
        body: body.to_string(),
        subreddit: parent.subreddit.clone(),
        link_id: parent.fullname(),
        parent_id: parent.fullname(),
        author,
        submission: Some(Box::new(parent.clone())),
        created_utc: days_ago(0.1),
        ..Default::default()
    }
}

/// Client knowing `rust` (SFW, large) and `nsfw_art` (NSFW, small)
pub fn platform() -> Arc<RecordingClient> {
    Arc::new(
        RecordingClient::new()
            .with_subreddit(community("rust", 300_000, false))
            .with_subreddit(community("nsfw_art", 800, true))
            .with_muted("rust", &["troll"])
            .with_contributors("rust", &["ferris"]),
    )
}

/// Ids of the items, in order
pub fn ids(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .map(|item| match item {
            Item::Submission(s) => s.id.clone(),
            Item::Comment(c) => c.id.clone(),
            Item::Redditor(r) => r.name.clone(),
            Item::Subreddit(s) => s.display_name.clone(),
        })
        .collect()
}
