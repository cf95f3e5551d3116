//! Predicates on submissions and comments
//!
//! Functions taking `submission_only` read the attribute from the parent
//! submission when the item is a comment. That needs the submission to be
//! embedded in the comment; otherwise evaluation fails with
//! `AttributeNotFound`.

use crate::base::{age_compare, attribute_compare, attribute_equals, attribute_length, attribute_true, number_compare};
use crate::predicate::Predicate;
use subkit_core::item::{COMMENT_PREFIX, SUBMISSION_PREFIX};
use subkit_core::{
    AttributeScope, Comparison, Error, FieldValue, Item, ItemKind, Result, Submission,
};

fn scope(submission_only: bool) -> AttributeScope {
    if submission_only {
        AttributeScope::Submission
    } else {
        AttributeScope::Item
    }
}

/// The submission an item is or belongs to, when it is at hand
fn submission_of(item: &Item) -> Result<&Submission> {
    match item {
        Item::Submission(s) => Ok(s),
        Item::Comment(c) => c
            .submission
            .as_deref()
            .ok_or_else(|| Error::attribute_not_found(ItemKind::Comment, "submission")),
        other => Err(Error::attribute_not_found(other.kind(), "submission")),
    }
}

// ============================================================================
// Thread position
// ============================================================================

/// The submission `id` itself and every comment under it
///
/// `id` may carry the `t3_` prefix.
pub fn parent_submission(id: &str) -> Predicate {
    let id = id.strip_prefix(SUBMISSION_PREFIX).unwrap_or(id).to_string();
    let fullname = format!("{}{}", SUBMISSION_PREFIX, id);
    Predicate::new(move |item: &Item| match item {
        Item::Submission(s) => Ok(s.id == id),
        Item::Comment(c) => Ok(c.link_id == fullname),
        other => Err(Error::attribute_not_found(other.kind(), "link_id")),
    })
}

/// Direct replies to the comment `id`
///
/// `id` may carry the `t1_` prefix. Submissions never match.
pub fn parent_comment(id: &str) -> Predicate {
    let fullname = format!("{}{}", COMMENT_PREFIX, id.strip_prefix(COMMENT_PREFIX).unwrap_or(id));
    Predicate::new(move |item: &Item| match item {
        Item::Comment(c) => Ok(c.parent_id == fullname),
        Item::Submission(_) => Ok(false),
        other => Err(Error::attribute_not_found(other.kind(), "parent_id")),
    })
}

// ============================================================================
// Generic attributes
// ============================================================================

/// Attribute equals `value`
pub fn content_attribute(attribute: &str, value: impl Into<FieldValue>, submission_only: bool) -> Predicate {
    attribute_equals(scope(submission_only), attribute, value)
}

/// Attribute `<symbol>` `value`
pub fn content_number(
    attribute: &str,
    symbol: &str,
    value: impl Into<FieldValue>,
    submission_only: bool,
) -> Result<Predicate> {
    attribute_compare(scope(submission_only), attribute, symbol, value)
}

/// Length of a text attribute `<symbol>` `value`
pub fn content_length(attribute: &str, symbol: &str, value: usize, submission_only: bool) -> Result<Predicate> {
    attribute_length(scope(submission_only), attribute, symbol, value)
}

/// Attribute is truthy, or falsy when `opposite` is set
pub fn content_true(attribute: &str, opposite: bool, submission_only: bool) -> Predicate {
    attribute_true(scope(submission_only), attribute, opposite)
}

/// Item age `<symbol>` `amount` `unit`
///
/// `content_age(">", 2.0, "hours")` keeps things posted more than two hours ago.
pub fn content_age(symbol: &str, amount: f64, unit: &str) -> Result<Predicate> {
    age_compare(symbol, amount, unit, |item: &Item| Ok(Some(item.created())))
}

/// Score `<symbol>` `karma`
pub fn content_karma(symbol: &str, karma: i64) -> Result<Predicate> {
    number_compare(symbol, karma as f64, |item: &Item| match item {
        Item::Submission(s) => Ok(Some(s.score as f64)),
        Item::Comment(c) => Ok(Some(c.score as f64)),
        other => Err(Error::attribute_not_found(other.kind(), "score")),
    })
}

/// Number of replies `<symbol>` `amount`
///
/// Comments count their loaded replies; submissions report `num_comments`.
pub fn content_reply_count(symbol: &str, amount: u64) -> Result<Predicate> {
    number_compare(symbol, amount as f64, |item: &Item| match item {
        Item::Submission(s) => Ok(Some(s.num_comments as f64)),
        Item::Comment(c) => Ok(Some(c.replies.len() as f64)),
        other => Err(Error::attribute_not_found(other.kind(), "replies")),
    })
}

// ============================================================================
// Awards
// ============================================================================

/// Has been gilded
pub fn content_gilded() -> Predicate {
    content_true("gilded", false, false)
}

/// Has received any award
pub fn content_awarded() -> Predicate {
    content_true("all_awardings", false, false)
}

/// Count of the award called `name` `<symbol>` `amount`
///
/// Awards not received count as zero.
pub fn content_award(symbol: &str, name: &str, amount: u64) -> Result<Predicate> {
    let name = name.to_string();
    number_compare(symbol, amount as f64, move |item: &Item| {
        Ok(Some(item.awards()?.award_count(&name) as f64))
    })
}

/// Thresholds for [`content_awards`]; unset thresholds are not checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AwardThresholds {
    /// Silver (`gid_1`)
    pub silver: Option<u64>,
    /// Gold (`gid_2`)
    pub gold: Option<u64>,
    /// Platinum (`gid_3`)
    pub platinum: Option<u64>,
    /// Every award, community awards included
    pub total: Option<u64>,
}

/// Every set threshold satisfies count `<symbol>` threshold
pub fn content_awards(symbol: &str, thresholds: AwardThresholds) -> Result<Predicate> {
    let comparison: Comparison = symbol.parse()?;
    Ok(Predicate::new(move |item: &Item| {
        let awards = item.awards()?;
        let checks = [
            (awards.gilding("gid_1"), thresholds.silver),
            (awards.gilding("gid_2"), thresholds.gold),
            (awards.gilding("gid_3"), thresholds.platinum),
            (awards.total_awards_received, thresholds.total),
        ];
        Ok(checks.iter().all(|(count, threshold)| {
            threshold.map_or(true, |threshold| comparison.compare(count, &threshold))
        }))
    }))
}

// ============================================================================
// Submission shape
// ============================================================================

/// Text posts
pub fn submission_selftext() -> Predicate {
    content_true("is_self", false, true)
}

/// Link posts
pub fn submission_url() -> Predicate {
    content_true("is_self", true, true)
}

/// Length of the post text `<symbol>` `value`
pub fn submission_selftext_length(symbol: &str, value: usize) -> Result<Predicate> {
    content_length("selftext", symbol, value, true)
}

/// Length of the post title `<symbol>` `value`
pub fn submission_title_length(symbol: &str, value: usize) -> Result<Predicate> {
    content_length("title", symbol, value, true)
}

/// Posts marked NSFW, or not marked when `negate` is set
pub fn submission_nsfw(negate: bool) -> Predicate {
    content_true("over_18", negate, true)
}

/// Images hosted on the platform's own media domain
pub fn submission_reddit_image(negate: bool) -> Predicate {
    Predicate::new(move |item: &Item| {
        let s = submission_of(item)?;
        Ok((s.is_reddit_media_domain && !s.is_video) != negate)
    })
}

/// Videos hosted on the platform's own media domain
pub fn submission_reddit_video(negate: bool) -> Predicate {
    Predicate::new(move |item: &Item| {
        let s = submission_of(item)?;
        Ok((s.is_reddit_media_domain && s.is_video) != negate)
    })
}

/// Length of a comment body `<symbol>` `value`
pub fn comment_body_length(symbol: &str, value: usize) -> Result<Predicate> {
    content_length("body", symbol, value, false)
}
