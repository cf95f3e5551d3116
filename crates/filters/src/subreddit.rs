//! Predicates on communities
//!
//! Everything except [`filter_subreddit`] needs a full community snapshot,
//! which is fetched through the filter's community cache. Snapshots stay
//! fresh for the community TTL (an hour unless changed with
//! [`Filterable::set_subreddit_cache`](crate::Filterable::set_subreddit_cache)).

use crate::base::{age_compare_with_clock, length_matches};
use crate::filterable::CachedFilters;
use crate::predicate::Predicate;
use subkit_core::{Comparison, FieldValue, Item, Result, Timestamp};

/// Items in (or being) the community called `name`, ignoring case
pub fn filter_subreddit(name: &str) -> Predicate {
    let name = name.to_ascii_lowercase();
    Predicate::new(move |item: &Item| Ok(item.community_name()?.to_ascii_lowercase() == name))
}

impl CachedFilters {
    fn community_attribute(&self, item: &Item, attribute: &str) -> Result<FieldValue> {
        self.community(item)?.attribute(attribute)
    }

    /// Community attribute equals `value`
    pub fn subreddit_attribute(&self, attribute: &str, value: impl Into<FieldValue>) -> Predicate {
        let filters = self.clone();
        let attribute = attribute.to_string();
        let value = value.into();
        Predicate::new(move |item: &Item| Ok(filters.community_attribute(item, &attribute)? == value))
    }

    /// Community attribute `<symbol>` `value`
    pub fn subreddit_number(
        &self,
        attribute: &str,
        symbol: &str,
        value: impl Into<FieldValue>,
    ) -> Result<Predicate> {
        let comparison: Comparison = symbol.parse()?;
        let filters = self.clone();
        let attribute = attribute.to_string();
        let value = value.into();
        Ok(Predicate::new(move |item: &Item| {
            filters
                .community_attribute(item, &attribute)?
                .compare(comparison, &value, &attribute)
        }))
    }

    /// Length of a community text attribute `<symbol>` `value`
    pub fn subreddit_length(&self, attribute: &str, symbol: &str, value: usize) -> Result<Predicate> {
        let comparison: Comparison = symbol.parse()?;
        let filters = self.clone();
        let attribute = attribute.to_string();
        Ok(Predicate::new(move |item: &Item| {
            length_matches(&filters.community_attribute(item, &attribute)?, &attribute, comparison, value)
        }))
    }

    /// Community attribute is truthy, or falsy when `opposite` is set
    pub fn subreddit_true(&self, attribute: &str, opposite: bool) -> Predicate {
        let filters = self.clone();
        let attribute = attribute.to_string();
        Predicate::new(move |item: &Item| {
            Ok(filters.community_attribute(item, &attribute)?.truthy() != opposite)
        })
    }

    /// Community age `<symbol>` `amount` `unit`
    pub fn subreddit_age(&self, symbol: &str, amount: f64, unit: &str) -> Result<Predicate> {
        let filters = self.clone();
        age_compare_with_clock(symbol, amount, unit, self.clock(), move |item: &Item| {
            Ok(Some(Timestamp::from_secs_f64(filters.community(item)?.created_utc)))
        })
    }

    /// Subscriber count `<symbol>` `amount`
    pub fn subreddit_subscribers(&self, symbol: &str, amount: u64) -> Result<Predicate> {
        self.subreddit_number("subscribers", symbol, amount)
    }

    /// Community is marked NSFW, or is not when `negate` is set
    pub fn subreddit_nsfw(&self, negate: bool) -> Predicate {
        self.subreddit_true("over18", negate)
    }

    /// Length of the community name `<symbol>` `value`
    pub fn subreddit_name_length(&self, symbol: &str, value: usize) -> Result<Predicate> {
        self.subreddit_length("display_name", symbol, value)
    }
}
