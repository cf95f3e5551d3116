//! In-memory collaborators for tests
//!
//! [`RecordingClient`] answers community lookups from fixtures and records
//! every call; [`ScriptedWikiPage`] behaves like a wiki page whose history
//! other editors can change between our read and our write.
//!
//! # Example
//!
//! ```
//! use subkit_core::testing::ScriptedWikiPage;
//! use subkit_core::{EditRequest, WikiPage};
//!
//! let page = ScriptedWikiPage::new("A");
//! page.inject_conflict("B");
//! let stale = page.latest_revision().unwrap();
//! let result = page.edit(&EditRequest {
//!     content: "A!".into(),
//!     reason: None,
//!     previous: stale.id,
//! });
//! assert!(result.unwrap_err().is_conflict());
//! assert_eq!(page.content(), "B");
//! ```

use crate::client::{
    ComposeRequest, EditConflict, EditRequest, PlatformClient, WikiPage, WikiRevision,
};
use crate::error::{Error, Result};
use crate::item::Subreddit;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

/// Which lookup a [`RecordingClient`] served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fetch {
    /// `subreddit`
    Subreddit,
    /// `muted`
    Muted,
    /// `contributors`
    Contributors,
}

/// Fixture-backed [`PlatformClient`] that counts what it is asked
#[derive(Debug, Default)]
pub struct RecordingClient {
    subreddits: Mutex<HashMap<String, Subreddit>>,
    muted: Mutex<HashMap<String, Vec<String>>>,
    contributors: Mutex<HashMap<String, Vec<String>>>,
    fetches: Mutex<HashMap<(Fetch, String), usize>>,
    sent: Mutex<Vec<ComposeRequest>>,
    compose_error: Mutex<Option<String>>,
}

impl RecordingClient {
    /// Client with no fixtures
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `subreddit` for lookups of its name
    pub fn with_subreddit(self, subreddit: Subreddit) -> Self {
        self.put_subreddit(subreddit);
        self
    }

    /// Serve `names` as the muted list of `subreddit`
    pub fn with_muted(self, subreddit: &str, names: &[&str]) -> Self {
        self.put_muted(subreddit, names);
        self
    }

    /// Serve `names` as the approved submitters of `subreddit`
    pub fn with_contributors(self, subreddit: &str, names: &[&str]) -> Self {
        self.contributors
            .lock()
            .insert(key(subreddit), names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Replace a community fixture
    pub fn put_subreddit(&self, subreddit: Subreddit) {
        self.subreddits
            .lock()
            .insert(key(&subreddit.display_name), subreddit);
    }

    /// Replace a muted-list fixture
    pub fn put_muted(&self, subreddit: &str, names: &[&str]) {
        self.muted
            .lock()
            .insert(key(subreddit), names.iter().map(|n| n.to_string()).collect());
    }

    /// Make every following `compose_message` fail with a client error
    pub fn fail_compose(&self, message: &str) {
        *self.compose_error.lock() = Some(message.to_string());
    }

    /// How often `fetch` was served for `subreddit`
    pub fn fetch_count(&self, fetch: Fetch, subreddit: &str) -> usize {
        self.fetches
            .lock()
            .get(&(fetch, key(subreddit)))
            .copied()
            .unwrap_or(0)
    }

    /// How often `fetch` was served for any community
    pub fn total_fetches(&self, fetch: Fetch) -> usize {
        self.fetches
            .lock()
            .iter()
            .filter(|((kind, _), _)| *kind == fetch)
            .map(|(_, count)| count)
            .sum()
    }

    /// Every compose request received, in order
    pub fn sent(&self) -> Vec<ComposeRequest> {
        self.sent.lock().clone()
    }

    fn record(&self, fetch: Fetch, subreddit: &str) {
        *self.fetches.lock().entry((fetch, key(subreddit))).or_insert(0) += 1;
    }
}

fn key(subreddit: &str) -> String {
    subreddit.to_ascii_lowercase()
}

impl PlatformClient for RecordingClient {
    fn compose_message(&self, request: &ComposeRequest) -> Result<serde_json::Value> {
        if let Some(message) = self.compose_error.lock().clone() {
            return Err(Error::Client(message));
        }
        self.sent.lock().push(request.clone());
        Ok(serde_json::json!({ "json": { "errors": [] } }))
    }

    fn subreddit(&self, name: &str) -> Result<Subreddit> {
        self.record(Fetch::Subreddit, name);
        self.subreddits
            .lock()
            .get(&key(name))
            .cloned()
            .ok_or_else(|| Error::client(format!("subreddit not found: {}", name)))
    }

    fn muted(&self, subreddit: &str) -> Result<Vec<String>> {
        self.record(Fetch::Muted, subreddit);
        Ok(self.muted.lock().get(&key(subreddit)).cloned().unwrap_or_default())
    }

    fn contributors(&self, subreddit: &str) -> Result<Vec<String>> {
        self.record(Fetch::Contributors, subreddit);
        Ok(self
            .contributors
            .lock()
            .get(&key(subreddit))
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// Wiki page
// ============================================================================

#[derive(Debug)]
struct PageState {
    current: WikiRevision,
    next_revision: u64,
    concurrent: VecDeque<String>,
    perpetual: bool,
    failure: Option<String>,
    submissions: Vec<EditRequest>,
}

impl PageState {
    fn commit(&mut self, content: String) {
        self.current = WikiRevision {
            id: format!("rev-{}", self.next_revision),
            content,
        };
        self.next_revision += 1;
    }
}

/// A [`WikiPage`] with scripted concurrent editors
///
/// Revisions are numbered `rev-1`, `rev-2`, ... in commit order.
#[derive(Debug)]
pub struct ScriptedWikiPage {
    state: Mutex<PageState>,
}

impl ScriptedWikiPage {
    /// Page whose first revision holds `content`
    pub fn new(content: &str) -> Self {
        let mut state = PageState {
            current: WikiRevision {
                id: String::new(),
                content: String::new(),
            },
            next_revision: 1,
            concurrent: VecDeque::new(),
            perpetual: false,
            failure: None,
            submissions: Vec::new(),
        };
        state.commit(content.to_string());
        ScriptedWikiPage {
            state: Mutex::new(state),
        }
    }

    /// Have another editor commit `content` just before our next edit lands
    pub fn inject_conflict(&self, content: &str) {
        self.state.lock().concurrent.push_back(content.to_string());
    }

    /// Have another editor win the race on every edit
    pub fn conflict_forever(&self) {
        self.state.lock().perpetual = true;
    }

    /// Reject the next edit with a client error
    pub fn fail_next_edit(&self, message: &str) {
        self.state.lock().failure = Some(message.to_string());
    }

    /// Current content
    pub fn content(&self) -> String {
        self.state.lock().current.content.clone()
    }

    /// Current revision id
    pub fn revision(&self) -> String {
        self.state.lock().current.id.clone()
    }

    /// Every edit submitted, accepted or not
    pub fn submissions(&self) -> Vec<EditRequest> {
        self.state.lock().submissions.clone()
    }
}

impl WikiPage for ScriptedWikiPage {
    fn latest_revision(&self) -> Result<WikiRevision> {
        Ok(self.state.lock().current.clone())
    }

    fn edit(&self, request: &EditRequest) -> Result<()> {
        let mut state = self.state.lock();
        state.submissions.push(request.clone());

        if let Some(message) = state.failure.take() {
            return Err(Error::Client(message));
        }
        if let Some(content) = state.concurrent.pop_front() {
            state.commit(content);
        } else if state.perpetual {
            let content = format!("concurrent edit {}", state.next_revision);
            state.commit(content);
        }

        if request.previous != state.current.id {
            return Err(EditConflict {
                content: state.current.content.clone(),
                revision: state.current.id.clone(),
            }
            .into());
        }
        state.commit(request.content.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_client_counts_fetches() {
        let client = RecordingClient::new().with_subreddit(Subreddit::new("Rust"));
        client.subreddit("rust").unwrap();
        client.subreddit("RUST").unwrap();
        client.muted("rust").unwrap();
        assert_eq!(client.fetch_count(Fetch::Subreddit, "rust"), 2);
        assert_eq!(client.fetch_count(Fetch::Muted, "rust"), 1);
        assert_eq!(client.total_fetches(Fetch::Contributors), 0);
    }

    #[test]
    fn test_unknown_subreddit_is_client_error() {
        let client = RecordingClient::new();
        assert!(matches!(client.subreddit("nope"), Err(Error::Client(_))));
    }

    #[test]
    fn test_edit_without_conflict() {
        let page = ScriptedWikiPage::new("A");
        let rev = page.latest_revision().unwrap();
        page.edit(&EditRequest {
            content: "A2".into(),
            reason: None,
            previous: rev.id,
        })
        .unwrap();
        assert_eq!(page.content(), "A2");
        assert_eq!(page.revision(), "rev-2");
    }

    #[test]
    fn test_stale_revision_conflicts() {
        let page = ScriptedWikiPage::new("A");
        let err = page
            .edit(&EditRequest {
                content: "x".into(),
                reason: None,
                previous: "rev-0".into(),
            })
            .unwrap_err();
        match err {
            Error::Conflict(conflict) => {
                assert_eq!(conflict.content, "A");
                assert_eq!(conflict.revision, "rev-1");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_fail_next_edit_is_one_shot() {
        let page = ScriptedWikiPage::new("A");
        page.fail_next_edit("403");
        let request = EditRequest {
            content: "B".into(),
            reason: None,
            previous: "rev-1".into(),
        };
        assert!(matches!(page.edit(&request), Err(Error::Client(_))));
        page.edit(&request).unwrap();
        assert_eq!(page.submissions().len(), 2);
    }
}
