//! Six-way comparison symbols
//!
//! A symbol is parsed once when a predicate is built; evaluation then goes
//! through [`Comparison::compare`] with no further string handling.

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// One of `<`, `>`, `<=`, `>=`, `==`, `!=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `<=`
    LessOrEqual,
    /// `>=`
    GreaterOrEqual,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
}

impl Comparison {
    /// Every comparison, in symbol-table order
    pub const ALL: [Comparison; 6] = [
        Comparison::LessThan,
        Comparison::GreaterThan,
        Comparison::LessOrEqual,
        Comparison::GreaterOrEqual,
        Comparison::Equal,
        Comparison::NotEqual,
    ];

    /// Textual symbol
    pub const fn symbol(self) -> &'static str {
        match self {
            Comparison::LessThan => "<",
            Comparison::GreaterThan => ">",
            Comparison::LessOrEqual => "<=",
            Comparison::GreaterOrEqual => ">=",
            Comparison::Equal => "==",
            Comparison::NotEqual => "!=",
        }
    }

    /// Whether an ordering of `left` relative to `right` satisfies the symbol
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Comparison::LessThan => ordering == Ordering::Less,
            Comparison::GreaterThan => ordering == Ordering::Greater,
            Comparison::LessOrEqual => ordering != Ordering::Greater,
            Comparison::GreaterOrEqual => ordering != Ordering::Less,
            Comparison::Equal => ordering == Ordering::Equal,
            Comparison::NotEqual => ordering != Ordering::Equal,
        }
    }

    /// `left <symbol> right`
    ///
    /// Unordered pairs (NaN) only satisfy `!=`.
    pub fn compare<T: PartialOrd + ?Sized>(self, left: &T, right: &T) -> bool {
        match left.partial_cmp(right) {
            Some(ordering) => self.accepts(ordering),
            None => self == Comparison::NotEqual,
        }
    }

    /// The comparison as a plain function pointer
    pub fn as_fn<T: PartialOrd>(self) -> fn(&T, &T) -> bool {
        match self {
            Comparison::LessThan => |a, b| a < b,
            Comparison::GreaterThan => |a, b| a > b,
            Comparison::LessOrEqual => |a, b| a <= b,
            Comparison::GreaterOrEqual => |a, b| a >= b,
            Comparison::Equal => |a, b| a == b,
            Comparison::NotEqual => |a, b| a != b,
        }
    }
}

impl FromStr for Comparison {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Comparison::ALL
            .into_iter()
            .find(|c| c.symbol() == s)
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "'{}' is not a comparison symbol, expected one of: <, >, <=, >=, ==, !=",
                    s
                ))
            })
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
