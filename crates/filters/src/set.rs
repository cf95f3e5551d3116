//! AND/OR predicate lists
//!
//! An item passes a [`FilterSet`] when every AND predicate passes (or there
//! are none) and at least one OR predicate passes (or there are none).
//!
//! Every predicate runs for every item, including after the outcome is
//! already decided. Cache warm-up inside predicates therefore does not depend
//! on list order, and the first error in list order is the one reported.

use crate::predicate::{FilterKind, Predicate};
use subkit_core::{Item, Result};

/// Ordered AND and OR predicate lists
#[derive(Debug)]
pub struct FilterSet<T = Item> {
    and: Vec<Predicate<T>>,
    or: Vec<Predicate<T>>,
}

impl<T> Clone for FilterSet<T> {
    fn clone(&self) -> Self {
        FilterSet {
            and: self.and.clone(),
            or: self.or.clone(),
        }
    }
}

impl<T> Default for FilterSet<T> {
    fn default() -> Self {
        FilterSet {
            and: Vec::new(),
            or: Vec::new(),
        }
    }
}

impl<T> FilterSet<T> {
    /// Empty set, which accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to one of the lists
    pub fn push(&mut self, kind: FilterKind, predicate: Predicate<T>) {
        match kind {
            FilterKind::And => self.and.push(predicate),
            FilterKind::Or => self.or.push(predicate),
        }
    }

    /// AND predicates in insertion order
    pub fn and_filters(&self) -> &[Predicate<T>] {
        &self.and
    }

    /// OR predicates in insertion order
    pub fn or_filters(&self) -> &[Predicate<T>] {
        &self.or
    }

    /// Number of predicates in both lists
    pub fn len(&self) -> usize {
        self.and.len() + self.or.len()
    }

    /// No predicates at all
    pub fn is_empty(&self) -> bool {
        self.and.is_empty() && self.or.is_empty()
    }

    /// Whether `item` passes
    pub fn matches(&self, item: &T) -> Result<bool> {
        let mut first_error = None;
        let mut run = |predicate: &Predicate<T>| match predicate.evaluate(item) {
            Ok(passed) => passed,
            Err(e) => {
                first_error.get_or_insert(e);
                false
            }
        };

        let mut all_and = true;
        for predicate in &self.and {
            all_and &= run(predicate);
        }
        let mut any_or = self.or.is_empty();
        for predicate in &self.or {
            any_or |= run(predicate);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(all_and && any_or),
        }
    }
}
