//! Generic attribute predicates
//!
//! The redditor, subreddit and content factories are thin wrappers over these,
//! differing only in the [`AttributeScope`] the attribute is read through.
//! Comparison symbols and time units are parsed here, when the predicate is
//! built, so a bad symbol fails immediately rather than per item.

use crate::predicate::Predicate;
use std::sync::Arc;
use subkit_core::{
    get_seconds, AttributeScope, Clock, Comparison, FieldValue, Item, Result, SystemClock,
    Timestamp,
};

/// Attribute equals `value`
pub fn attribute_equals(
    scope: AttributeScope,
    attribute: &str,
    value: impl Into<FieldValue>,
) -> Predicate {
    let attribute = attribute.to_string();
    let value = value.into();
    Predicate::new(move |item: &Item| Ok(item.attribute_in(scope, &attribute)? == value))
}

/// Attribute `<symbol>` `value`
pub fn attribute_compare(
    scope: AttributeScope,
    attribute: &str,
    symbol: &str,
    value: impl Into<FieldValue>,
) -> Result<Predicate> {
    let comparison: Comparison = symbol.parse()?;
    let attribute = attribute.to_string();
    let value = value.into();
    Ok(Predicate::new(move |item: &Item| {
        item.attribute_in(scope, &attribute)?
            .compare(comparison, &value, &attribute)
    }))
}

/// Attribute is truthy, or falsy when `opposite` is set
pub fn attribute_true(scope: AttributeScope, attribute: &str, opposite: bool) -> Predicate {
    let attribute = attribute.to_string();
    Predicate::new(move |item: &Item| Ok(item.attribute_in(scope, &attribute)?.truthy() != opposite))
}

/// Length of a text or list attribute `<symbol>` `value`
///
/// Scalars fail with a type mismatch. A deleted author's attributes have no
/// length and never match.
pub fn attribute_length(
    scope: AttributeScope,
    attribute: &str,
    symbol: &str,
    value: usize,
) -> Result<Predicate> {
    let comparison: Comparison = symbol.parse()?;
    let attribute = attribute.to_string();
    Ok(Predicate::new(move |item: &Item| {
        length_matches(&item.attribute_in(scope, &attribute)?, &attribute, comparison, value)
    }))
}

/// Null has no length and never matches; other scalars are a type mismatch
pub(crate) fn length_matches(
    field: &FieldValue,
    attribute: &str,
    comparison: Comparison,
    value: usize,
) -> Result<bool> {
    if matches!(field, FieldValue::Null) {
        return Ok(false);
    }
    let len = field.len().ok_or_else(|| subkit_core::Error::TypeMismatch {
        attribute: attribute.to_string(),
        expected: "text, list or map",
        actual: field.type_name(),
    })?;
    Ok(comparison.compare(&len, &value))
}

/// Number computed from an item `<symbol>` `value`
///
/// `extract` returning `None` (no such account, say) never matches.
pub fn number_compare<F>(symbol: &str, value: f64, extract: F) -> Result<Predicate>
where
    F: Fn(&Item) -> Result<Option<f64>> + Send + Sync + 'static,
{
    let comparison: Comparison = symbol.parse()?;
    Ok(Predicate::new(move |item: &Item| {
        Ok(match extract(item)? {
            Some(number) => comparison.compare(&number, &value),
            None => false,
        })
    }))
}

/// Age `<symbol>` `amount` `unit`, measured against the wall clock
///
/// Age is now minus the creation time `created` returns, so `"<"` keeps
/// things younger than the threshold.
pub fn age_compare<F>(symbol: &str, amount: f64, unit: &str, created: F) -> Result<Predicate>
where
    F: Fn(&Item) -> Result<Option<Timestamp>> + Send + Sync + 'static,
{
    age_compare_with_clock(symbol, amount, unit, Arc::new(SystemClock), created)
}

/// [`age_compare`] with an explicit clock
pub fn age_compare_with_clock<F>(
    symbol: &str,
    amount: f64,
    unit: &str,
    clock: Arc<dyn Clock>,
    created: F,
) -> Result<Predicate>
where
    F: Fn(&Item) -> Result<Option<Timestamp>> + Send + Sync + 'static,
{
    let comparison: Comparison = symbol.parse()?;
    let threshold = get_seconds(amount, unit)?;
    Ok(Predicate::new(move |item: &Item| {
        Ok(match created(item)? {
            Some(at) => comparison.compare(&clock.now().secs_since(at), &threshold),
            None => false,
        })
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use subkit_core::{Error, ManualClock, Redditor, Submission};

    fn post(score: i64, title: &str) -> Item {
        Submission {
            id: "p".into(),
            score,
            title: title.into(),
            author: Some(Redditor::new("alice")),
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn test_equals() {
        let p = attribute_equals(AttributeScope::Item, "title", "hello");
        assert!(p.evaluate(&post(1, "hello")).unwrap());
        assert!(!p.evaluate(&post(1, "bye")).unwrap());
    }

    #[test]
    fn test_compare_all_symbols() {
        let item = post(10, "x");
        let cases = [("<", 11, true), (">", 10, false), ("<=", 10, true), (">=", 11, false), ("==", 10, true), ("!=", 10, false)];
        for (symbol, value, expected) in cases {
            let p = attribute_compare(AttributeScope::Item, "score", symbol, value).unwrap();
            assert_eq!(p.evaluate(&item).unwrap(), expected, "score {} {}", symbol, value);
        }
    }

    #[test]
    fn test_bad_symbol_fails_at_construction() {
        let err = attribute_compare(AttributeScope::Item, "score", "=>", 1).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_missing_attribute_surfaces() {
        let p = attribute_true(AttributeScope::Item, "stickied", false);
        assert!(matches!(p.evaluate(&post(1, "x")), Err(Error::AttributeNotFound { .. })));
    }

    #[test]
    fn test_true_with_opposite() {
        let item: Item = Submission {
            is_self: true,
            ..Default::default()
        }
        .into();
        assert!(attribute_true(AttributeScope::Item, "is_self", false).evaluate(&item).unwrap());
        assert!(!attribute_true(AttributeScope::Item, "is_self", true).evaluate(&item).unwrap());
    }

    #[test]
    fn test_length() {
        let p = attribute_length(AttributeScope::Item, "title", ">", 3).unwrap();
        assert!(p.evaluate(&post(0, "long title")).unwrap());
        assert!(!p.evaluate(&post(0, "abc")).unwrap());

        let scalar = attribute_length(AttributeScope::Item, "score", ">", 3).unwrap();
        assert!(matches!(scalar.evaluate(&post(0, "x")), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_age_against_manual_clock() {
        let clock = ManualClock::new(Timestamp::from_secs(10 * 86_400));
        let younger_than_week = age_compare_with_clock("<", 7.0, "days", Arc::new(clock.clone()), |item| {
            Ok(Some(item.created()))
        })
        .unwrap();

        let item: Item = Submission {
            created_utc: (5 * 86_400) as f64,
            ..Default::default()
        }
        .into();
        assert!(younger_than_week.evaluate(&item).unwrap());
        clock.advance_secs(3 * 86_400);
        assert!(!younger_than_week.evaluate(&item).unwrap());
    }

    #[test]
    fn test_age_bad_unit() {
        let err = age_compare("<", 1.0, "fortnights", |item| Ok(Some(item.created()))).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
