//! Literal coercion: typed scalars from unquoted text.
use crate::value::Value;

/// Turns trimmed, unquoted text into a scalar.
///
/// - `null`, `true` and `false` are recognized in any letter case.
/// - Text starting with a digit or `-` that contains `.`, `e` or `E` becomes a
///   [`Decimal`](Value::Decimal) if it parses to a finite `f64`.
/// - Other text starting with a digit or `-` becomes an
///   [`Integer`](Value::Integer) if it is the canonical rendering of an
///   `i64`, so `007`, `-0` and `+1` stay strings.
/// - Anything else is returned as a [`String`](Value::String) unchanged.
///
/// Never fails.
///
/// ```
/// use jsontok::{Value, coerce_literal};
///
/// assert_eq!(coerce_literal("TRUE"), Value::Boolean(true));
/// assert_eq!(coerce_literal("42"), Value::Integer(42));
/// assert_eq!(coerce_literal("2.75"), Value::Decimal(2.75));
/// assert_eq!(coerce_literal("007"), Value::String("007".into()));
/// ```
#[must_use]
pub fn coerce_literal(text: &str) -> Value {
    if text.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if text.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }
    if let Some(number) = coerce_number(text) {
        return number;
    }
    Value::String(text.to_owned())
}

fn coerce_number(text: &str) -> Option<Value> {
    let first = text.chars().next()?;
    if !(first.is_ascii_digit() || first == '-') {
        return None;
    }
    if text.contains(['.', 'e', 'E']) {
        return text
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Value::Decimal);
    }
    let n = text.parse::<i64>().ok()?;
    (n.to_string() == text).then_some(Value::Integer(n))
}
