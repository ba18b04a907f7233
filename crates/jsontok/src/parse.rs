use std::io;

use crate::{
    error::Result,
    options::ParserOptions,
    scanner::{END, Scanner},
    source::CharSource,
    value::Value,
};

/// Parses `text` as a single value followed only by whitespace.
///
/// ```
/// use jsontok::{Value, parse_str};
///
/// let value = parse_str("{name: 'jsontok', tags: [a, b]}").unwrap();
/// let map = value.as_object().unwrap();
/// assert_eq!(map["name"], Value::String("jsontok".into()));
/// ```
///
/// # Errors
///
/// Any syntax error in the value, or `trailing characters` if something
/// other than whitespace follows it.
pub fn parse_str(text: &str) -> Result<Value> {
    parse_str_with(text, ParserOptions::default())
}

/// [`parse_str`] with explicit options.
///
/// # Errors
///
/// See [`parse_str`].
pub fn parse_str_with(text: &str, options: ParserOptions) -> Result<Value> {
    parse_document(&mut Scanner::from_text(text, options))
}

/// Parses a UTF‑8 byte stream as a single value followed only by whitespace.
///
/// # Errors
///
/// See [`parse_str`]; read failures surface as
/// [`ScanError::Io`](crate::ScanError::Io).
pub fn parse_reader<R: io::Read>(reader: R) -> Result<Value> {
    parse_document(&mut Scanner::from_reader(reader, ParserOptions::default()))
}

fn parse_document<S: CharSource>(scanner: &mut Scanner<S>) -> Result<Value> {
    let value = scanner.next_value()?;
    if scanner.next_clean()? != END {
        return Err(scanner.syntax_error("trailing characters"));
    }
    Ok(value)
}
