//! Object and array builders.
//!
//! Both builders borrow the scanner exclusively and call back into it
//! through [`Scanner::next_value`], so nesting is plain mutual recursion.
//! Depth is tracked on the scanner and checked on entry; running past
//! [`ParserOptions::max_depth`](crate::ParserOptions::max_depth) yields an
//! [`Overflow`] that `next_value` turns into a positioned syntax error.
use tracing::trace;

use crate::{
    error::{Result, ScanError},
    scanner::{END, Scanner},
    source::CharSource,
    value::{Array, Map, Value},
};

/// Why a builder stopped early.
#[derive(Debug)]
pub(crate) enum Overflow {
    /// An object would nest deeper than allowed.
    Object,
    /// An array would nest deeper than allowed.
    Array,
    Scan(ScanError),
}

impl From<ScanError> for Overflow {
    fn from(e: ScanError) -> Self {
        Overflow::Scan(e)
    }
}

/// Runs `body` one level deeper, restoring the depth afterwards.
fn nested<S: CharSource, T>(
    scanner: &mut Scanner<S>,
    overflow: Overflow,
    body: impl FnOnce(&mut Scanner<S>) -> Result<T>,
) -> Result<T, Overflow> {
    if scanner.depth >= scanner.options().max_depth {
        return Err(overflow);
    }
    scanner.depth += 1;
    trace!(depth = scanner.depth, "enter container");
    let result = body(scanner);
    scanner.depth -= 1;
    Ok(result?)
}

/// Builds an object starting at the next `{`.
pub(crate) fn parse_object<S: CharSource>(scanner: &mut Scanner<S>) -> Result<Value, Overflow> {
    nested(scanner, Overflow::Object, object_body).map(Value::Object)
}

/// Builds an array starting at the next `[`.
pub(crate) fn parse_array<S: CharSource>(scanner: &mut Scanner<S>) -> Result<Value, Overflow> {
    nested(scanner, Overflow::Array, array_body).map(Value::Array)
}

fn object_body<S: CharSource>(scanner: &mut Scanner<S>) -> Result<Map> {
    if scanner.next_clean()? != '{' {
        return Err(scanner.syntax_error("object text must begin with '{'"));
    }
    let mut map = Map::new();
    loop {
        let key = match scanner.next_clean()? {
            END => return Err(scanner.syntax_error("object text must end with '}'")),
            '}' => return Ok(map),
            q @ ('"' | '\'') => scanner.next_string(q)?,
            '{' | '[' => return Err(scanner.syntax_error("object key must be a string")),
            _ => {
                scanner.back()?;
                let key = scanner.next_unquoted()?;
                if key.is_empty() {
                    return Err(scanner.syntax_error("missing value"));
                }
                key
            }
        };

        if scanner.next_clean()? != ':' {
            return Err(scanner.syntax_error("expected ':' after a key"));
        }

        let options = *scanner.options();
        if options.reject_duplicate_keys && map.contains_key(&key) {
            return Err(scanner.syntax_error(format!("duplicate key {key:?}")));
        }
        let value = scanner.next_value()?;
        if !(options.ignore_null_value && value.is_null()) {
            map.insert(key, value);
        }

        match scanner.next_clean()? {
            ',' | ';' => {
                if scanner.next_clean()? == '}' {
                    return Ok(map);
                }
                scanner.back()?;
            }
            '}' => return Ok(map),
            _ => return Err(scanner.syntax_error("expected ',' or '}'")),
        }
    }
}

fn array_body<S: CharSource>(scanner: &mut Scanner<S>) -> Result<Array> {
    if scanner.next_clean()? != '[' {
        return Err(scanner.syntax_error("array text must begin with '['"));
    }
    let mut items = Array::new();
    if scanner.next_clean()? == ']' {
        return Ok(items);
    }
    scanner.back()?;
    loop {
        match scanner.next_clean()? {
            END => return Err(scanner.syntax_error("array text must end with ']'")),
            ',' => {
                scanner.back()?;
                items.push(Value::Null);
            }
            _ => {
                scanner.back()?;
                items.push(scanner.next_value()?);
            }
        }

        match scanner.next_clean()? {
            ',' => {
                if scanner.next_clean()? == ']' {
                    return Ok(items);
                }
                scanner.back()?;
            }
            ']' => return Ok(items),
            _ => return Err(scanner.syntax_error("expected ',' or ']'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::{ParserOptions, Scanner, Value, value::Map};

    fn parse(text: &str) -> crate::Result<Value> {
        Scanner::from_text(text, ParserOptions::default()).next_value()
    }

    fn parse_with(text: &str, options: ParserOptions) -> crate::Result<Value> {
        Scanner::from_text(text, options).next_value()
    }

    #[test]
    fn object_keeps_insertion_order() {
        let value = parse(r#"{"b": 1, "a": 2, "c": 3}"#).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn unquoted_keys_are_not_coerced() {
        let value = parse("{007: x, true: 1.50}").unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map["007"], Value::String("x".into()));
        assert_eq!(map["true"], Value::Decimal(1.5));
    }

    #[test]
    fn semicolons_separate_members() {
        let value = parse("{'a': 1; 'b': 2;}").unwrap();
        assert_eq!(value.as_object().unwrap().len(), 2);
    }

    #[test]
    fn empty_array_slots_are_null() {
        let value = parse("[1,,2,]").unwrap();
        assert_eq!(
            value,
            Value::Array(vec![Value::Integer(1), Value::Null, Value::Integer(2)])
        );
    }

    #[test]
    fn nested_containers() {
        let value = parse(r#"{"a": [{"b": []}, {}]}"#).unwrap();
        let mut inner = Map::new();
        inner.insert("b".into(), Value::Array(vec![]));
        let mut outer = Map::new();
        outer.insert(
            "a".into(),
            Value::Array(vec![Value::Object(inner), Value::Object(Map::new())]),
        );
        assert_eq!(value, Value::Object(outer));
    }

    #[test]
    fn duplicate_keys_overwrite_by_default() {
        let value = parse(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.get_index(0), Some((&"a".to_string(), &Value::Integer(3))));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn duplicate_keys_rejected_when_configured() {
        let options = ParserOptions {
            reject_duplicate_keys: true,
            ..Default::default()
        };
        let err = parse_with(r#"{"a": 1, "a": 3}"#, options).unwrap_err();
        assert_eq!(err.message(), Some(r#"duplicate key "a""#));
    }

    #[test]
    fn null_members_dropped_when_configured() {
        let options = ParserOptions {
            ignore_null_value: true,
            ..Default::default()
        };
        let value = parse_with(r#"{"a": null, "b": [null]}"#, options).unwrap();
        let map = value.as_object().unwrap();
        assert!(!map.contains_key("a"));
        assert_eq!(map["b"], Value::Array(vec![Value::Null]));
    }

    #[rstest]
    #[case::unclosed_object("{\"a\": 1", "expected ',' or '}'")]
    #[case::eof_in_object("{", "object text must end with '}'")]
    #[case::missing_colon("{\"a\" 1}", "expected ':' after a key")]
    #[case::bad_member_separator("{\"a\": 1 \"b\": 2}", "expected ',' or '}'")]
    #[case::composite_key("{[1]: 2}", "object key must be a string")]
    #[case::empty_key("{,}", "missing value")]
    #[case::eof_in_array("[1,", "array text must end with ']'")]
    #[case::bad_element_separator("[\"a\" \"b\"]", "expected ',' or ']'")]
    #[case::missing_element("[1, :]", "missing value")]
    fn malformed_containers(#[case] input: &str, #[case] message: &str) {
        let err = parse(input).unwrap_err();
        assert!(err.is_syntax(), "{err}");
        assert_eq!(err.message(), Some(message));
    }

    #[test]
    fn depth_limit_reports_innermost_container() {
        let options = ParserOptions {
            max_depth: 3,
            ..Default::default()
        };
        assert!(parse_with("[[[1]]]", options).is_ok());

        let err = parse_with("[[[[1]]]]", options).unwrap_err();
        assert_eq!(err.message(), Some("array depth too large"));

        let err = parse_with(r#"[[{"a": {}}]]"#, options).unwrap_err();
        assert_eq!(err.message(), Some("object depth too large"));
    }

    #[test]
    fn depth_is_restored_after_errors() {
        let mut scanner = Scanner::from_text("[[x:] [1]", ParserOptions::default());
        assert!(scanner.next_value().is_err());
        assert_eq!(scanner.depth, 0);
    }

    #[test]
    fn deep_nesting_within_default_limit() {
        let depth = 100;
        let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let mut value = parse(&text).unwrap();
        let mut seen = 0;
        while let Value::Array(mut items) = value {
            seen += 1;
            value = items.pop().unwrap_or(Value::Null);
        }
        assert_eq!(seen, depth);
    }
}
