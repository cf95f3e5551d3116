//! Wiki page updates and messaging through the facade crate
//!
//! The page tests drive the update loop against a scripted page whose
//! history other editors change underneath it, including real concurrent
//! updaters on several threads.

mod common;

use common::*;
use std::sync::Arc;
use std::thread;
use subkit::{
    send_message, update_page_with, Destination, Error, MessageExt, SubkitConfig, UpdateOptions,
    WikiPage, WikiPageExt,
};

// ============================================================================
// Page updates
// ============================================================================

#[test]
fn conflicting_edit_is_reapplied_to_the_newer_content() {
    let page = ScriptedWikiPage::new("A");
    page.inject_conflict("B");

    let report = page.update(|old| format!("{} | suffix", old), Some("append suffix")).unwrap();

    assert_eq!(page.content(), "B | suffix");
    assert_eq!(report.attempts, 2);
    let submissions = page.submissions();
    assert_eq!(submissions.len(), 2);
    assert!(submissions.iter().all(|s| s.reason.as_deref() == Some("append suffix")));
}

#[test]
fn transformation_sees_every_intermediate_version() {
    let page = ScriptedWikiPage::new("v1");
    page.inject_conflict("v2");
    page.inject_conflict("v3");

    let seen = parking_lot::Mutex::new(Vec::new());
    page.update(
        |old| {
            seen.lock().push(old.to_string());
            format!("{}+mine", old)
        },
        None,
    )
    .unwrap();

    assert_eq!(*seen.lock(), vec!["v1", "v2", "v3"]);
    assert_eq!(page.content(), "v3+mine");
}

#[test]
fn bounded_policy_from_config() {
    let config = SubkitConfig::from_toml_str("[update]\nmax_conflicts = 2\n").unwrap();
    let page = ScriptedWikiPage::new("A");
    page.conflict_forever();

    let err = update_page_with(&page, |old| old.to_uppercase(), None, UpdateOptions::from(&config.update))
        .unwrap_err();
    assert!(matches!(err, Error::ConflictLimitExceeded { attempts: 2 }));
    assert!(page.content().starts_with("concurrent edit"));
}

#[test]
fn unbounded_by_default() {
    let config = SubkitConfig::default();
    assert_eq!(UpdateOptions::from(&config.update), UpdateOptions::unbounded());

    let page = ScriptedWikiPage::new("start");
    for i in 0..25 {
        page.inject_conflict(&format!("edit {}", i));
    }
    let report = page.update(|old| format!("{}.", old), None).unwrap();
    assert_eq!(report.attempts, 26);
    assert_eq!(page.content(), "edit 24.");
}

#[test]
fn non_conflict_errors_stop_the_loop() {
    let page = ScriptedWikiPage::new("A");
    page.inject_conflict("B");
    page.fail_next_edit("page is locked");

    let err = page.update(|old| format!("{}!", old), None).unwrap_err();
    assert!(matches!(err, Error::Client(ref m) if m == "page is locked"));
    // The failed edit came before the other editor's commit
    assert_eq!(page.content(), "A");
    assert_eq!(page.submissions().len(), 1);
}

#[test]
fn concurrent_updaters_each_land_once() {
    let page = Arc::new(ScriptedWikiPage::new("log:"));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let page = Arc::clone(&page);
            thread::spawn(move || {
                page.update(move |old| format!("{} {}", old, i), Some("append")).unwrap()
            })
        })
        .collect();
    let attempts: usize = handles.into_iter().map(|h| h.join().unwrap().attempts).sum();

    let content = page.content();
    let mut entries: Vec<&str> = content.trim_start_matches("log:").split_whitespace().collect();
    entries.sort_unstable();
    assert_eq!(entries, vec!["0", "1", "2", "3", "4", "5", "6", "7"]);
    assert_eq!(attempts, page.submissions().len());
    assert_eq!(page.latest_revision().unwrap().id, "rev-9");
}

// ============================================================================
// Messages
// ============================================================================

#[test]
fn messages_to_users_and_communities() {
    let client = platform();
    let rust = community("rust", 1, false);

    client.message("spez", "Hello", "Body one", None).unwrap();
    client.message(&rust, "Modmail", "Body two", Some("nsfw_art")).unwrap();
    send_message(client.as_ref(), Destination::User("ferris".into()), "Hi", "Body three", None).unwrap();

    let sent = client.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].to, "spez");
    assert_eq!(sent[1].to, "/r/rust");
    assert_eq!(sent[1].from_sr.as_deref(), Some("nsfw_art"));
    assert_eq!(sent[2].to, "ferris");
    assert_eq!(sent[2].text, "Body three");
}

#[test]
fn message_failures_are_returned() {
    let client = platform();
    client.fail_compose("RATELIMIT");
    let err = client.message("spez", "s", "b", None).unwrap_err();
    assert!(matches!(err, Error::Client(ref m) if m == "RATELIMIT"));
    assert!(client.sent().is_empty());
}
