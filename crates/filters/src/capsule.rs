//! Filter capsules
//!
//! A capsule is a nested [`FilterSet`] that takes part in an outer set as one
//! predicate. It expresses rules that flat AND/OR lists cannot, for example:
//!
//! - accounts younger than 7 days that are approved or have 200+ karma, or
//! - accounts younger than 30 days that are approved or have 100+ karma, or
//! - accounts older than 30 days.
//!
//! Each line becomes a capsule with one AND and two OR entries, and the three
//! capsules are OR entries of the stream's filter.

use crate::predicate::{FilterKind, Predicate};
use crate::set::FilterSet;
use std::fmt;
use subkit_core::{Item, Result};

/// A nested AND/OR filter usable as a single predicate
#[derive(Debug)]
pub struct FilterCapsule<T = Item> {
    set: FilterSet<T>,
}

impl<T> Clone for FilterCapsule<T> {
    fn clone(&self) -> Self {
        FilterCapsule {
            set: self.set.clone(),
        }
    }
}

impl<T> Default for FilterCapsule<T> {
    fn default() -> Self {
        FilterCapsule {
            set: FilterSet::new(),
        }
    }
}

impl<T: 'static> FilterCapsule<T> {
    /// Empty capsule, which accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an AND entry
    pub fn add_and_filter(mut self, predicate: impl Into<Predicate<T>>) -> Self {
        self.set.push(FilterKind::And, predicate.into());
        self
    }

    /// Add an OR entry
    pub fn add_or_filter(mut self, predicate: impl Into<Predicate<T>>) -> Self {
        self.set.push(FilterKind::Or, predicate.into());
        self
    }

    /// Add an entry to the list named by `kind` (`"and"` / `"or"`, any case)
    pub fn add_filter(mut self, kind: &str, predicate: impl Into<Predicate<T>>) -> Result<Self> {
        self.set.push(kind.parse()?, predicate.into());
        Ok(self)
    }

    /// AND entries
    pub fn and_filters(&self) -> &[Predicate<T>] {
        self.set.and_filters()
    }

    /// OR entries
    pub fn or_filters(&self) -> &[Predicate<T>] {
        self.set.or_filters()
    }

    /// Number of entries in both lists
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// No entries
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Combined verdict of the capsule's own lists
    pub fn matches(&self, item: &T) -> Result<bool> {
        self.set.matches(item)
    }
}

impl<T: 'static> From<FilterCapsule<T>> for Predicate<T> {
    fn from(capsule: FilterCapsule<T>) -> Self {
        let set = capsule.set;
        Predicate::new(move |item| set.matches(item))
    }
}

impl<T> fmt::Display for FilterCapsule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<FilterCapsule with {} AND filters & {} OR filters>",
            self.set.and_filters().len(),
            self.set.or_filters().len()
        )
    }
}
