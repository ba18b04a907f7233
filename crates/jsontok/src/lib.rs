//! A streaming JSON tokener.
//!
//! [`Scanner`] reads characters from a [`CharSource`] and turns them into the
//! primitive pieces of a lenient JSON grammar: quoted strings (single or
//! double quotes), unquoted literals, structural characters and positions for
//! diagnostics. It keeps one character of pushback, tracks line and column,
//! and can skip ahead to a character with full rollback when it is absent.
//!
//! [`Scanner::next_value`] ties it together: strings are decoded, unquoted
//! literals are coerced with [`coerce_literal`], and objects and arrays are
//! assembled by builders that drive the scanner recursively.
//!
//! ```rust
//! use jsontok::{ParserOptions, Scanner, Value};
//!
//! let mut scanner = Scanner::from_text(r#"{"key": [null, true, 2.5, 'x']}"#, ParserOptions::default());
//! let value = scanner.next_value().unwrap();
//! let items = value.as_object().unwrap()["key"].as_array().unwrap();
//! assert_eq!(items[0], Value::Null);
//! assert_eq!(items[3], Value::String("x".into()));
//! ```

mod builder;
mod coerce;
mod error;
mod options;
mod parse;
mod scanner;
mod source;
mod value;

pub use coerce::coerce_literal;
pub use error::{Result, ScanError};
pub use options::{DEFAULT_MAX_DEPTH, ParserOptions};
pub use parse::{parse_reader, parse_str, parse_str_with};
pub use scanner::{END, Position, SKIP_LOOKAHEAD_LIMIT, Scanner};
pub use source::{CharSource, IterSource, Rewind, StrSource, Utf8Source};
pub use value::{Array, Map, Value};
