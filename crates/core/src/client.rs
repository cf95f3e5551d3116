//! Collaborator traits
//!
//! subkit never talks to the network itself. Whatever client library is in
//! use implements [`PlatformClient`] for account-level calls and [`WikiPage`]
//! for individual wiki pages; the helpers only see these traits.
//!
//! ## Conflicts
//!
//! An edit carries the revision id it was computed from. When the page has
//! moved on, the platform answers with a conflict body holding the page's
//! current content and revision; implementations map that answer to
//! [`Error::Conflict`], typically via [`EditConflict::from_response_body`].

use crate::error::{Error, Result};
use crate::item::Subreddit;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix the platform expects on community message recipients
pub const COMMUNITY_PREFIX: &str = "/r/";

/// Account-level operations of the wrapped client
pub trait PlatformClient: Send + Sync {
    /// Submit one compose-message request and return the platform's reply
    fn compose_message(&self, request: &ComposeRequest) -> Result<serde_json::Value>;

    /// Fetch a community snapshot by name
    fn subreddit(&self, name: &str) -> Result<Subreddit>;

    /// Names of accounts muted in a community (moderator only)
    fn muted(&self, subreddit: &str) -> Result<Vec<String>>;

    /// Names of approved submitters of a community (moderator only)
    fn contributors(&self, subreddit: &str) -> Result<Vec<String>>;
}

/// One wiki page
pub trait WikiPage {
    /// Current content and revision
    fn latest_revision(&self) -> Result<WikiRevision>;

    /// Replace the content, failing with [`Error::Conflict`] when `previous`
    /// is no longer the current revision
    fn edit(&self, request: &EditRequest) -> Result<()>;
}

/// Content of a page at one revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiRevision {
    /// Revision id
    pub id: String,
    /// Markdown content
    pub content: String,
}

/// A conditional page edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRequest {
    /// New content
    pub content: String,
    /// Edit reason shown in the page history
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Revision the new content was computed from
    pub previous: String,
}

/// The page's actual state reported with a rejected edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditConflict {
    /// Current content
    #[serde(rename = "newcontent")]
    pub content: String,
    /// Current revision id
    #[serde(rename = "newrevision")]
    pub revision: String,
}

impl EditConflict {
    /// Parse the platform's conflict body (`{"newcontent", "newrevision", ...}`)
    pub fn from_response_body(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }
}

impl From<EditConflict> for Error {
    fn from(conflict: EditConflict) -> Self {
        Error::Conflict(conflict)
    }
}

// ============================================================================
// Messages
// ============================================================================

/// Who a private message goes to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    /// A user account, sent as the plain name
    User(String),
    /// A community's moderators, sent as `/r/<name>`
    Community(String),
}

impl Destination {
    /// Recipient as the platform expects it in the `to` field
    pub fn wire_format(&self) -> String {
        match self {
            Destination::User(name) => name.clone(),
            Destination::Community(name) => format!("{}{}", COMMUNITY_PREFIX, name),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.wire_format())
    }
}

impl From<&str> for Destination {
    /// Plain strings are user names and are sent unchanged
    fn from(name: &str) -> Self {
        Destination::User(name.to_string())
    }
}

impl From<String> for Destination {
    fn from(name: String) -> Self {
        Destination::User(name)
    }
}

impl From<&crate::item::Redditor> for Destination {
    fn from(redditor: &crate::item::Redditor) -> Self {
        Destination::User(redditor.name.clone())
    }
}

impl From<&Subreddit> for Destination {
    fn from(subreddit: &Subreddit) -> Self {
        Destination::Community(subreddit.display_name.clone())
    }
}

/// Body of a compose-message call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeRequest {
    /// Subject line
    pub subject: String,
    /// Markdown body
    pub text: String,
    /// Wire-formatted recipient
    pub to: String,
    /// Community the message is sent on behalf of
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_sr: Option<String>,
}
