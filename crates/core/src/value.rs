//! Dynamic attribute values
//!
//! Predicates that look attributes up by name get back a [`FieldValue`].
//! It mirrors JSON with a single numeric type, which is what the platform
//! sends and what the comparison predicates need.

use crate::comparison::Comparison;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Tolerance used when comparing numbers for equality
pub const FLOAT_EPSILON: f64 = 1e-9;

/// Value of a named attribute on an item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Absent / JSON null
    Null,
    /// Boolean flag
    Bool(bool),
    /// Any number
    Number(f64),
    /// Text
    Text(String),
    /// Array
    List(Vec<FieldValue>),
    /// Object
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Convert a JSON value
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(*b),
            serde_json::Value::Number(n) => FieldValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => FieldValue::Text(s.clone()),
            serde_json::Value::Array(items) => {
                FieldValue::List(items.iter().map(FieldValue::from_json).collect())
            }
            serde_json::Value::Object(map) => FieldValue::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), FieldValue::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "text",
            FieldValue::List(_) => "list",
            FieldValue::Map(_) => "map",
        }
    }

    /// Truthiness: null, false, zero and empty containers are false
    pub fn truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::List(items) => !items.is_empty(),
            FieldValue::Map(map) => !map.is_empty(),
        }
    }

    /// Length of text (in characters), list or map; `None` for scalars
    pub fn len(&self) -> Option<usize> {
        match self {
            FieldValue::Text(s) => Some(s.chars().count()),
            FieldValue::List(items) => Some(items.len()),
            FieldValue::Map(map) => Some(map.len()),
            _ => None,
        }
    }

    /// Numeric view, with booleans counting as 0/1
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Text view
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Ordering between two values of compatible types
    ///
    /// Numbers (and booleans) order numerically, text orders lexically.
    /// Anything else is a [`Error::TypeMismatch`] on `attribute`.
    pub fn try_cmp(&self, other: &FieldValue, attribute: &str) -> Result<Option<Ordering>> {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => Ok(Some(a.cmp(b))),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => Ok(a.partial_cmp(&b)),
                _ => Err(Error::TypeMismatch {
                    attribute: attribute.to_string(),
                    expected: other.type_name(),
                    actual: self.type_name(),
                }),
            },
        }
    }

    /// `self <symbol> other`, failing on incomparable types
    ///
    /// Null never orders against anything: `<`, `>`, `<=` and `>=` are false.
    pub fn compare(&self, comparison: Comparison, other: &FieldValue, attribute: &str) -> Result<bool> {
        if matches!(comparison, Comparison::Equal | Comparison::NotEqual) {
            let equal = self == other;
            return Ok(equal == (comparison == Comparison::Equal));
        }
        if matches!(self, FieldValue::Null) || matches!(other, FieldValue::Null) {
            return Ok(false);
        }
        Ok(match self.try_cmp(other, attribute)? {
            Some(ordering) => comparison.accepts(ordering),
            None => false,
        })
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => true,
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            (FieldValue::List(a), FieldValue::List(b)) => a == b,
            (FieldValue::Map(a), FieldValue::Map(b)) => a == b,
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => (a - b).abs() <= FLOAT_EPSILON,
                _ => false,
            },
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{:?}", s),
            FieldValue::List(items) => write!(f, "[{} items]", items.len()),
            FieldValue::Map(map) => write!(f, "{{{} keys}}", map.len()),
        }
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(n: $t) -> Self {
                FieldValue::Number(n as f64)
            }
        })*
    };
}

impl_from_number!(i32, i64, u32, u64, usize, f32, f64);

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        FieldValue::from_json(&value)
    }
}
