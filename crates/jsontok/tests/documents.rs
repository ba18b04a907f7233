#![expect(missing_docs)]

use std::io;

use insta::assert_snapshot;
use jsontok::{
    DEFAULT_MAX_DEPTH, END, ParserOptions, Scanner, Value, parse_reader, parse_str, parse_str_with,
};
use rstest::rstest;

mod common;

use crate::common::{DOCUMENT, LENIENT, expected_document};

/// Hands out one byte per `read` call, splitting multibyte characters.
struct Trickle<'a>(&'a [u8]);

impl io::Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.0.split_first() {
            Some((&b, rest)) if !buf.is_empty() => {
                buf[0] = b;
                self.0 = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

struct Failing;

impl io::Read for Failing {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"))
    }
}

#[test]
fn strict_document_matches_serde_json() {
    assert_eq!(parse_str(DOCUMENT).unwrap(), expected_document());
}

#[test]
fn lenient_document_matches_strict_one() {
    assert_eq!(parse_str(LENIENT).unwrap(), expected_document());
}

#[test]
fn reader_matches_text() {
    let from_reader = parse_reader(Trickle(DOCUMENT.as_bytes())).unwrap();
    assert_eq!(from_reader, expected_document());
}

#[test]
fn reader_failure_is_io() {
    let err = parse_reader(Failing).unwrap_err();
    assert!(err.is_io());
    assert_snapshot!(err, @"i/o failure: peer went away");
}

#[test]
fn invalid_utf8_is_replaced() {
    let value = parse_reader(&b"['a\xFFb']"[..]).unwrap();
    assert_eq!(
        value,
        Value::Array(vec![Value::String("a\u{FFFD}b".into())])
    );
}

#[rstest]
#[case::scalar("  42  ", Value::Integer(42))]
#[case::word("hello", Value::String("hello".into()))]
#[case::empty_object("{}", Value::Object(jsontok::Map::new()))]
#[case::empty_array("[]", Value::Array(vec![]))]
fn single_values(#[case] text: &str, #[case] expected: Value) {
    assert_eq!(parse_str(text).unwrap(), expected);
}

#[test]
fn trailing_characters_are_rejected() {
    let err = parse_str("{} x").unwrap_err();
    assert_snapshot!(err, @"trailing characters at 4 [character 5 line 1]");
}

#[rstest]
#[case::empty("", "missing value")]
#[case::unclosed_object("{\"a\": 1,", "object text must end with '}'")]
#[case::unclosed_array("[1, 2,", "array text must end with ']'")]
#[case::missing_colon("{\"a\" 1}", "expected ':' after a key")]
#[case::bad_member_separator("{\"a\": 1 \"b\": 2}", "expected ',' or '}'")]
#[case::composite_key("{[1]: 2}", "object key must be a string")]
fn malformed_documents(#[case] text: &str, #[case] message: &str) {
    let err = parse_str(text).unwrap_err();
    assert!(err.is_syntax());
    assert_eq!(err.message(), Some(message));
}

#[test]
fn errors_report_line_and_column() {
    let err = parse_str("{\n  \"a\": 1,\n  \"b\" 2\n}").unwrap_err();
    let position = err.position().unwrap();
    assert_eq!(position.line, 3);
    assert_eq!(position.column, 7);
}

#[rstest]
#[case::arrays("[[[[1]]]]", "array depth too large")]
#[case::objects("{a: {b: {c: {d: 1}}}}", "object depth too large")]
fn depth_limit(#[case] text: &str, #[case] message: &str) {
    let options = ParserOptions {
        max_depth: 3,
        ..Default::default()
    };
    let err = parse_str_with(text, options).unwrap_err();
    assert_eq!(err.message(), Some(message));
}

#[test]
fn nesting_below_the_default_limit() {
    let depth = 64;
    let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    let mut value = parse_str(&text).unwrap();
    let mut seen = 0;
    while let Value::Array(mut items) = value {
        seen += 1;
        value = items.pop().unwrap_or(Value::Null);
    }
    assert_eq!(seen, depth);
}

#[test]
fn default_limit_is_exact() {
    let nest = |depth: usize| format!("{}1{}", "{a:".repeat(depth), "}".repeat(depth));
    assert!(parse_str(&nest(DEFAULT_MAX_DEPTH)).is_ok());
    let err = parse_str(&nest(DEFAULT_MAX_DEPTH + 1)).unwrap_err();
    assert_snapshot!(err, @"object depth too large at 384 [character 385 line 1]");
}

#[test]
fn options_reach_nested_builders() {
    let options = ParserOptions {
        ignore_null_value: true,
        reject_duplicate_keys: true,
        ..Default::default()
    };
    let value = parse_str_with("{outer: {a: null, b: 1}, list: [null]}", options).unwrap();
    let map = value.as_object().unwrap();
    assert_eq!(map["outer"].as_object().unwrap().len(), 1);
    assert_eq!(map["list"], Value::Array(vec![Value::Null]));

    let err = parse_str_with("[{a: 1, a: 2}]", options).unwrap_err();
    assert_eq!(err.message(), Some("duplicate key \"a\""));
}

#[test]
fn scanning_records_from_a_reader() -> jsontok::Result<()> {
    let input = "# header\nname: alpha\n# skip\nname: beta\n";
    let mut scanner = Scanner::from_reader(input.as_bytes(), ParserOptions::default());
    let mut names = Vec::new();
    while scanner.skip_to('n')? != END {
        let key = scanner.next_to(':')?;
        assert_eq!(key, "name");
        scanner.next_char(':')?;
        names.push(scanner.next_to('\n')?);
    }
    assert_eq!(names, ["alpha", "beta"]);
    // The last failed skip leaves the scanner right after "beta".
    assert_eq!(scanner.next()?, '\n');
    assert_eq!(scanner.next()?, END);
    assert!(scanner.end());
    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn values_serialize_with_serde() {
    let value = parse_str("{b: [1, 2.5, x], a: null}").unwrap();
    let json = serde_json::to_string(&value).unwrap();
    let back: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(back, value);
}
