//! Predicates on accounts
//!
//! On a redditor stream these look at the item itself; on submissions and
//! comments they look at the author. Posts by deleted accounts never match.

use crate::base::{age_compare, attribute_compare, attribute_equals, attribute_true, number_compare};
use crate::cache::Membership;
use crate::filterable::CachedFilters;
use crate::predicate::Predicate;
use std::time::Duration;
use subkit_core::{AttributeScope, FieldValue, Item, Redditor, Result, Timestamp};

/// Items by (or being) the account called `name`, ignoring case
pub fn filter_redditor(name: &str) -> Predicate {
    let name = name.to_string();
    Predicate::new(move |item: &Item| Ok(item.author()?.map_or(false, |author| author.is_named(&name))))
}

/// Account attribute equals `value`
pub fn redditor_attribute(attribute: &str, value: impl Into<FieldValue>) -> Predicate {
    attribute_equals(AttributeScope::Author, attribute, value)
}

/// Account attribute `<symbol>` `value`
pub fn redditor_number(attribute: &str, symbol: &str, value: impl Into<FieldValue>) -> Result<Predicate> {
    attribute_compare(AttributeScope::Author, attribute, symbol, value)
}

/// Account attribute is truthy, or falsy when `opposite` is set
pub fn redditor_true(attribute: &str, opposite: bool) -> Predicate {
    attribute_true(AttributeScope::Author, attribute, opposite)
}

/// Account age `<symbol>` `amount` `unit`
///
/// `account_age("<", 7.0, "days")` keeps accounts younger than a week.
pub fn account_age(symbol: &str, amount: f64, unit: &str) -> Result<Predicate> {
    age_compare(symbol, amount, unit, |item: &Item| {
        Ok(item
            .author()?
            .map(|author| Timestamp::from_secs_f64(author.created_utc)))
    })
}

/// Link karma `<symbol>` `karma`
pub fn account_link_karma(symbol: &str, karma: i64) -> Result<Predicate> {
    karma_compare(symbol, karma, |author| author.link_karma)
}

/// Comment karma `<symbol>` `karma`
pub fn account_comment_karma(symbol: &str, karma: i64) -> Result<Predicate> {
    karma_compare(symbol, karma, |author| author.comment_karma)
}

/// Link plus comment karma `<symbol>` `karma`
pub fn account_karma(symbol: &str, karma: i64) -> Result<Predicate> {
    karma_compare(symbol, karma, Redditor::total_karma)
}

fn karma_compare(symbol: &str, karma: i64, karma_of: fn(&Redditor) -> i64) -> Result<Predicate> {
    number_compare(symbol, karma as f64, move |item: &Item| {
        Ok(item.author()?.map(|author| karma_of(author) as f64))
    })
}

impl CachedFilters {
    /// Author is muted in the item's community
    ///
    /// The muted list is fetched per community and reused for the configured
    /// membership TTL. Needs moderator access to every community filtered.
    pub fn account_muted(&self) -> Predicate {
        self.account_muted_with_ttl(self.membership_ttl())
    }

    /// [`account_muted`](Self::account_muted) refreshing every `ttl`
    pub fn account_muted_with_ttl(&self, ttl: Duration) -> Predicate {
        self.membership(Membership::Muted, ttl)
    }

    /// Author is an approved submitter of the item's community
    pub fn account_approved_submitter(&self) -> Predicate {
        self.account_approved_submitter_with_ttl(self.membership_ttl())
    }

    /// [`account_approved_submitter`](Self::account_approved_submitter) refreshing every `ttl`
    pub fn account_approved_submitter_with_ttl(&self, ttl: Duration) -> Predicate {
        self.membership(Membership::ApprovedSubmitter, ttl)
    }

    fn membership(&self, kind: Membership, ttl: Duration) -> Predicate {
        let filters = self.clone();
        Predicate::new(move |item: &Item| filters.is_member(kind, ttl, item))
    }
}
