//! Predicates and filter kinds

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use subkit_core::{Error, Item, Result};

type PredicateFn<T> = dyn Fn(&T) -> Result<bool> + Send + Sync;

/// A test applied to one item
///
/// Evaluation is fallible so attribute lookups can report what was missing.
/// Cloning shares the underlying function.
pub struct Predicate<T = Item> {
    test: Arc<PredicateFn<T>>,
}

impl<T: 'static> Predicate<T> {
    /// Wrap a fallible test
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&T) -> Result<bool> + Send + Sync + 'static,
    {
        Predicate {
            test: Arc::new(test),
        }
    }

    /// Wrap a test that cannot fail
    pub fn infallible<F>(test: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Predicate::new(move |item| Ok(test(item)))
    }

    /// Predicate that passes exactly when `self` fails
    pub fn negate(self) -> Self {
        let test = self.test;
        Predicate::new(move |item| Ok(!test(item)?))
    }

    /// Negate when `negate` is set, otherwise return `self` unchanged
    pub fn negated_if(self, negate: bool) -> Self {
        if negate {
            self.negate()
        } else {
            self
        }
    }
}

impl<T> Predicate<T> {
    /// Run the test
    pub fn evaluate(&self, item: &T) -> Result<bool> {
        (self.test)(item)
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Predicate {
            test: Arc::clone(&self.test),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

impl<T: 'static, F> From<F> for Predicate<T>
where
    F: Fn(&T) -> Result<bool> + Send + Sync + 'static,
{
    fn from(test: F) -> Self {
        Predicate::new(test)
    }
}

/// Which list of a filter set a predicate joins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Every AND predicate must pass
    And,
    /// At least one OR predicate must pass
    Or,
}

impl FromStr for FilterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("and") {
            Ok(FilterKind::And)
        } else if s.eq_ignore_ascii_case("or") {
            Ok(FilterKind::Or)
        } else {
            Err(Error::invalid_argument(format!(
                "unrecognized filter type {:?}, valid filter types are 'and' and 'or'",
                s
            )))
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FilterKind::And => "AND",
            FilterKind::Or => "OR",
        })
    }
}
