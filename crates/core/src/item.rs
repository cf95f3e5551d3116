//! Item model
//!
//! Streams hand out four kinds of things: submissions, comments, redditors
//! and subreddits. They are modelled as one tagged union, [`Item`], so a
//! single predicate type can be applied to any stream. The wire tags follow
//! the platform's `t1`/`t2`/`t3`/`t5` listing kinds.
//!
//! Attributes can be looked up by name through [`Item::attribute`] and
//! [`Item::attribute_in`]; the typed fields are always available directly.

use crate::error::{Error, Result};
use crate::timestamp::Timestamp;
use crate::value::FieldValue;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Untyped attributes carried alongside the typed ones
pub type Extra = BTreeMap<String, serde_json::Value>;

/// Fullname prefix of comments
pub const COMMENT_PREFIX: &str = "t1_";
/// Fullname prefix of submissions
pub const SUBMISSION_PREFIX: &str = "t3_";

// ============================================================================
// Redditor
// ============================================================================

/// A user account
///
/// Identity is the case-insensitive account name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Redditor {
    /// Account name
    pub name: String,
    /// Creation time, seconds since epoch
    #[serde(default)]
    pub created_utc: f64,
    /// Karma earned from posts
    #[serde(default)]
    pub link_karma: i64,
    /// Karma earned from comments
    #[serde(default)]
    pub comment_karma: i64,
    /// Remaining attributes
    #[serde(flatten)]
    pub extra: Extra,
}

impl Redditor {
    /// A redditor known only by name
    pub fn new(name: impl Into<String>) -> Self {
        Redditor {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Combined link and comment karma
    pub fn total_karma(&self) -> i64 {
        self.link_karma + self.comment_karma
    }

    /// Whether this account is called `name`, ignoring case
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    fn attribute(&self, name: &str) -> Option<FieldValue> {
        Some(match name {
            "name" => self.name.as_str().into(),
            "created_utc" => self.created_utc.into(),
            "link_karma" => self.link_karma.into(),
            "comment_karma" => self.comment_karma.into(),
            _ => return self.extra.get(name).map(FieldValue::from_json),
        })
    }
}

impl PartialEq for Redditor {
    fn eq(&self, other: &Self) -> bool {
        self.is_named(&other.name)
    }
}

impl Eq for Redditor {}

impl fmt::Display for Redditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Listings send the author as a bare name, or `[deleted]`; richer clients
/// send the whole account object.
fn deserialize_author<'de, D>(deserializer: D) -> std::result::Result<Option<Redditor>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Name(String),
        Account(Redditor),
    }

    Ok(match Option::<Wire>::deserialize(deserializer)? {
        Some(Wire::Name(name)) if name != "[deleted]" => Some(Redditor::new(name)),
        Some(Wire::Account(redditor)) => Some(redditor),
        _ => None,
    })
}

/// `null` reads as the default, like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Subreddit
// ============================================================================

/// A community
///
/// Identity is the case-insensitive display name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subreddit {
    /// Community name without the `r/` prefix
    pub display_name: String,
    /// Creation time, seconds since epoch
    #[serde(default)]
    pub created_utc: f64,
    /// Subscriber count
    #[serde(default, deserialize_with = "null_as_default")]
    pub subscribers: u64,
    /// Marked adult-only
    #[serde(default, deserialize_with = "null_as_default")]
    pub over18: bool,
    /// Remaining attributes
    #[serde(flatten)]
    pub extra: Extra,
}

impl Subreddit {
    /// A community known only by name
    pub fn new(display_name: impl Into<String>) -> Self {
        Subreddit {
            display_name: display_name.into(),
            ..Default::default()
        }
    }

    /// Whether this community is called `name`, ignoring case
    pub fn is_named(&self, name: &str) -> bool {
        self.display_name.eq_ignore_ascii_case(name)
    }

    /// Named attribute of a community snapshot
    pub fn attribute(&self, name: &str) -> Result<FieldValue> {
        let value = match name {
            "display_name" => Some(self.display_name.as_str().into()),
            "created_utc" => Some(self.created_utc.into()),
            "subscribers" => Some(self.subscribers.into()),
            "over18" => Some(self.over18.into()),
            _ => self.extra.get(name).map(FieldValue::from_json),
        };
        value.ok_or_else(|| Error::attribute_not_found(ItemKind::Subreddit, name))
    }
}

impl PartialEq for Subreddit {
    fn eq(&self, other: &Self) -> bool {
        self.is_named(&other.display_name)
    }
}

impl Eq for Subreddit {}

impl fmt::Display for Subreddit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

// ============================================================================
// Awards
// ============================================================================

/// One entry of `all_awardings`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Award {
    /// Award display name, e.g. "Silver"
    pub name: String,
    /// How many times it was given
    #[serde(default)]
    pub count: u64,
    /// Remaining attributes
    #[serde(flatten)]
    pub extra: Extra,
}

impl Award {
    /// An award given `count` times
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Award {
            name: name.into(),
            count,
            extra: Extra::new(),
        }
    }
}

/// Award bookkeeping shared by submissions and comments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Awards {
    /// Gold/platinum count
    #[serde(default)]
    pub gilded: u64,
    /// Counts keyed by gilding id (`gid_1` silver, `gid_2` gold, `gid_3` platinum)
    #[serde(default)]
    pub gildings: BTreeMap<String, u64>,
    /// Every award received
    #[serde(default)]
    pub all_awardings: Vec<Award>,
    /// Total number of awards received
    #[serde(default)]
    pub total_awards_received: u64,
}

impl Awards {
    /// Count of a gilding id, zero when absent
    pub fn gilding(&self, id: &str) -> u64 {
        self.gildings.get(id).copied().unwrap_or(0)
    }

    /// Count of the award called `name`, zero when absent
    pub fn award_count(&self, name: &str) -> u64 {
        self.all_awardings
            .iter()
            .find(|award| award.name == name)
            .map_or(0, |award| award.count)
    }

    fn attribute(&self, name: &str) -> Result<Option<FieldValue>> {
        Ok(Some(match name {
            "gilded" => self.gilded.into(),
            "gildings" => serde_json::to_value(&self.gildings)?.into(),
            "all_awardings" => serde_json::to_value(&self.all_awardings)?.into(),
            "total_awards_received" => self.total_awards_received.into(),
            _ => return Ok(None),
        }))
    }
}

// ============================================================================
// Submission
// ============================================================================

/// A post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Submission {
    /// Base-36 id without prefix
    pub id: String,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Body of a self post, empty for link posts
    #[serde(default)]
    pub selftext: String,
    /// Self (text) post rather than a link
    #[serde(default)]
    pub is_self: bool,
    /// Marked adult-only
    #[serde(default)]
    pub over_18: bool,
    /// Net votes
    #[serde(default)]
    pub score: i64,
    /// Creation time, seconds since epoch
    #[serde(default)]
    pub created_utc: f64,
    /// Author, `None` once deleted
    #[serde(default, deserialize_with = "deserialize_author")]
    pub author: Option<Redditor>,
    /// Community name
    #[serde(default)]
    pub subreddit: String,
    /// Comment count
    #[serde(default)]
    pub num_comments: u64,
    /// Awards
    #[serde(flatten)]
    pub awards: Awards,
    /// Hosted on the platform's own media domain
    #[serde(default)]
    pub is_reddit_media_domain: bool,
    /// Video post
    #[serde(default)]
    pub is_video: bool,
    /// Remaining attributes
    #[serde(flatten)]
    pub extra: Extra,
}

impl Submission {
    /// `t3_` fullname
    pub fn fullname(&self) -> String {
        format!("{}{}", SUBMISSION_PREFIX, self.id)
    }

    fn attribute(&self, name: &str) -> Result<Option<FieldValue>> {
        if let Some(value) = self.awards.attribute(name)? {
            return Ok(Some(value));
        }
        Ok(Some(match name {
            "id" => self.id.as_str().into(),
            "title" => self.title.as_str().into(),
            "selftext" => self.selftext.as_str().into(),
            "is_self" => self.is_self.into(),
            "over_18" => self.over_18.into(),
            "score" => self.score.into(),
            "created_utc" => self.created_utc.into(),
            "author" => self.author.as_ref().map(|a| a.name.clone()).into(),
            "subreddit" => self.subreddit.as_str().into(),
            "num_comments" => self.num_comments.into(),
            "is_reddit_media_domain" => self.is_reddit_media_domain.into(),
            "is_video" => self.is_video.into(),
            _ => return Ok(self.extra.get(name).map(FieldValue::from_json)),
        }))
    }
}

impl PartialEq for Submission {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

// ============================================================================
// Comment
// ============================================================================

/// A comment on a submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Comment {
    /// Base-36 id without prefix
    pub id: String,
    /// Markdown body
    #[serde(default)]
    pub body: String,
    /// Net votes
    #[serde(default)]
    pub score: i64,
    /// Creation time, seconds since epoch
    #[serde(default)]
    pub created_utc: f64,
    /// Author, `None` once deleted
    #[serde(default, deserialize_with = "deserialize_author")]
    pub author: Option<Redditor>,
    /// Community name
    #[serde(default)]
    pub subreddit: String,
    /// Fullname of the submission this comment belongs to
    #[serde(default)]
    pub link_id: String,
    /// Fullname of the parent comment or submission
    #[serde(default)]
    pub parent_id: String,
    /// Direct replies that have been loaded
    #[serde(default, deserialize_with = "deserialize_replies")]
    pub replies: Vec<Comment>,
    /// The parent submission, when the client embedded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission: Option<Box<Submission>>,
    /// Awards
    #[serde(flatten)]
    pub awards: Awards,
    /// Remaining attributes
    #[serde(flatten)]
    pub extra: Extra,
}

/// The platform sends `""` when no replies were loaded and a `Listing`
/// otherwise. Only `t1` children are kept; `more` stubs are dropped.
fn deserialize_replies<'de, D>(deserializer: D) -> std::result::Result<Vec<Comment>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    #[derive(Deserialize)]
    struct Child {
        kind: String,
        data: serde_json::Value,
    }

    #[derive(Deserialize)]
    struct Children {
        #[serde(default)]
        children: Vec<Child>,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Listing { data: Children },
        Comments(Vec<Comment>),
        NotLoaded(String),
    }

    match Option::<Wire>::deserialize(deserializer)? {
        Some(Wire::Listing { data }) => data
            .children
            .into_iter()
            .filter(|child| child.kind == "t1")
            .map(|child| serde_json::from_value(child.data).map_err(D::Error::custom))
            .collect(),
        Some(Wire::Comments(comments)) => Ok(comments),
        Some(Wire::NotLoaded(_)) | None => Ok(Vec::new()),
    }
}

impl Comment {
    /// `t1_` fullname
    pub fn fullname(&self) -> String {
        format!("{}{}", COMMENT_PREFIX, self.id)
    }

    fn attribute(&self, name: &str) -> Result<Option<FieldValue>> {
        if let Some(value) = self.awards.attribute(name)? {
            return Ok(Some(value));
        }
        Ok(Some(match name {
            "id" => self.id.as_str().into(),
            "body" => self.body.as_str().into(),
            "score" => self.score.into(),
            "created_utc" => self.created_utc.into(),
            "author" => self.author.as_ref().map(|a| a.name.clone()).into(),
            "subreddit" => self.subreddit.as_str().into(),
            "link_id" => self.link_id.as_str().into(),
            "parent_id" => self.parent_id.as_str().into(),
            "replies" => FieldValue::List(
                self.replies
                    .iter()
                    .map(|reply| FieldValue::from(reply.fullname()))
                    .collect(),
            ),
            _ => return Ok(self.extra.get(name).map(FieldValue::from_json)),
        }))
    }
}

impl PartialEq for Comment {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

// ============================================================================
// Item
// ============================================================================

/// Variant tag of an [`Item`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Post
    Submission,
    /// Comment
    Comment,
    /// User account
    Redditor,
    /// Community
    Subreddit,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemKind::Submission => "submission",
            ItemKind::Comment => "comment",
            ItemKind::Redditor => "redditor",
            ItemKind::Subreddit => "subreddit",
        })
    }
}

/// Which object an attribute is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttributeScope {
    /// The item itself
    #[default]
    Item,
    /// The item when it is a redditor, otherwise its author
    Author,
    /// The item when it is a submission, otherwise a comment's parent submission
    Submission,
}

/// Anything a stream can yield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum Item {
    /// `t1`
    #[serde(rename = "t1")]
    Comment(Comment),
    /// `t2`
    #[serde(rename = "t2")]
    Redditor(Redditor),
    /// `t3`
    #[serde(rename = "t3")]
    Submission(Submission),
    /// `t5`
    #[serde(rename = "t5")]
    Subreddit(Subreddit),
}

impl Item {
    /// Variant tag
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Submission(_) => ItemKind::Submission,
            Item::Comment(_) => ItemKind::Comment,
            Item::Redditor(_) => ItemKind::Redditor,
            Item::Subreddit(_) => ItemKind::Subreddit,
        }
    }

    /// Creation time of the item itself
    pub fn created(&self) -> Timestamp {
        Timestamp::from_secs_f64(match self {
            Item::Submission(s) => s.created_utc,
            Item::Comment(c) => c.created_utc,
            Item::Redditor(r) => r.created_utc,
            Item::Subreddit(s) => s.created_utc,
        })
    }

    /// The account behind the item
    ///
    /// A redditor is its own author. `Ok(None)` means the author was
    /// deleted; subreddits have no author at all.
    pub fn author(&self) -> Result<Option<&Redditor>> {
        match self {
            Item::Redditor(r) => Ok(Some(r)),
            Item::Submission(s) => Ok(s.author.as_ref()),
            Item::Comment(c) => Ok(c.author.as_ref()),
            Item::Subreddit(_) => Err(Error::attribute_not_found(ItemKind::Subreddit, "author")),
        }
    }

    /// Name of the community the item lives in (or is)
    pub fn community_name(&self) -> Result<&str> {
        match self {
            Item::Subreddit(s) => Ok(&s.display_name),
            Item::Submission(s) => Ok(&s.subreddit),
            Item::Comment(c) => Ok(&c.subreddit),
            Item::Redditor(_) => Err(Error::attribute_not_found(ItemKind::Redditor, "subreddit")),
        }
    }

    /// Award bookkeeping of a submission or comment
    pub fn awards(&self) -> Result<&Awards> {
        match self {
            Item::Submission(s) => Ok(&s.awards),
            Item::Comment(c) => Ok(&c.awards),
            other => Err(Error::attribute_not_found(other.kind(), "all_awardings")),
        }
    }

    /// Named attribute of the item itself
    pub fn attribute(&self, name: &str) -> Result<FieldValue> {
        let value = match self {
            Item::Submission(s) => s.attribute(name)?,
            Item::Comment(c) => c.attribute(name)?,
            Item::Redditor(r) => r.attribute(name),
            Item::Subreddit(s) => return s.attribute(name),
        };
        value.ok_or_else(|| Error::attribute_not_found(self.kind(), name))
    }

    /// Named attribute read through a scope
    ///
    /// Through [`AttributeScope::Author`] a deleted author reads as
    /// [`FieldValue::Null`]. Through [`AttributeScope::Submission`] a comment
    /// without an embedded submission fails with `AttributeNotFound`.
    pub fn attribute_in(&self, scope: AttributeScope, name: &str) -> Result<FieldValue> {
        match (scope, self) {
            (AttributeScope::Item, _)
            | (AttributeScope::Author, Item::Redditor(_))
            | (AttributeScope::Submission, Item::Submission(_)) => self.attribute(name),
            (AttributeScope::Author, _) => match self.author()? {
                Some(author) => author
                    .attribute(name)
                    .ok_or_else(|| Error::attribute_not_found(ItemKind::Redditor, name)),
                None => Ok(FieldValue::Null),
            },
            (AttributeScope::Submission, Item::Comment(c)) => match &c.submission {
                Some(submission) => submission
                    .attribute(name)?
                    .ok_or_else(|| Error::attribute_not_found(ItemKind::Submission, name)),
                None => Err(Error::attribute_not_found(ItemKind::Comment, "submission")),
            },
            (AttributeScope::Submission, other) => Err(Error::attribute_not_found(other.kind(), name)),
        }
    }
}

impl From<Submission> for Item {
    fn from(s: Submission) -> Self {
        Item::Submission(s)
    }
}

impl From<Comment> for Item {
    fn from(c: Comment) -> Self {
        Item::Comment(c)
    }
}

impl From<Redditor> for Item {
    fn from(r: Redditor) -> Self {
        Item::Redditor(r)
    }
}

impl From<Subreddit> for Item {
    fn from(s: Subreddit) -> Self {
        Item::Subreddit(s)
    }
}
