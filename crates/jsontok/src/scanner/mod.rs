//! Scanner: character-level tokenizer over a [`CharSource`].
//!
//! The scanner owns everything that happens below the level of a JSON value:
//! reading characters, a single character of pushback, end-of-stream
//! detection, line/column tracking, escape decoding and bounded skip-ahead.
//! Objects and arrays are assembled by the builders in [`crate::builder`],
//! which drive the scanner recursively through [`Scanner::next_value`].
//!
//! Invariants
//! - At most one character of pushback is pending at any time; stepping back
//!   twice without reading in between is a [`ScanError::MalformedState`].
//! - [`Scanner::end`] holds only when the source is exhausted *and* no
//!   pushback is pending.
//! - `'\0'` ([`END`]) is the end-of-stream sentinel. The pushback slot is an
//!   `Option`, so a pushed-back sentinel is never confused with "nothing
//!   pending".
//!
//! ```
//! use jsontok::{ParserOptions, Scanner};
//!
//! let mut scanner = Scanner::from_text("  key = value ;", ParserOptions::default());
//! assert_eq!(scanner.next_to('=').unwrap(), "key");
//! assert_eq!(scanner.next_char('=').unwrap(), '=');
//! assert_eq!(scanner.next_to_any(";").unwrap(), "value");
//! assert_eq!(scanner.next_clean().unwrap(), ';');
//! assert!(!scanner.more().unwrap());
//! ```
use core::fmt;
use std::io;

use tracing::trace;

use crate::{
    error::{Result, ScanError},
    options::ParserOptions,
    source::{CharSource, IterSource, Rewind, StrSource, Utf8Source},
};

mod cursor;
mod strings;
mod value;

use cursor::Cursor;
pub use cursor::{END, Position};

/// How many characters [`Scanner::skip_to`] may look ahead before giving up
/// on rewinding.
pub const SKIP_LOOKAHEAD_LIMIT: usize = 1_000_000;

/// A streaming JSON tokener bound to one character source.
pub struct Scanner<S> {
    source: S,
    cursor: Cursor,
    options: ParserOptions,
    /// Current container nesting, maintained by the builders.
    pub(crate) depth: usize,
}

impl<'a> Scanner<StrSource<'a>> {
    /// Creates a scanner over literal text.
    pub fn from_text(text: impl Into<std::borrow::Cow<'a, str>>, options: ParserOptions) -> Self {
        Self::new(StrSource::new(text), options)
    }
}

impl<R: io::Read> Scanner<Rewind<Utf8Source<R>>> {
    /// Creates a scanner over a UTF‑8 byte stream.
    pub fn from_reader(reader: R, options: ParserOptions) -> Self {
        Self::new(Rewind::new(Utf8Source::new(reader)), options)
    }
}

impl<I: Iterator<Item = char>> Scanner<Rewind<IterSource<I>>> {
    /// Creates a scanner over a stream of characters.
    pub fn from_chars(chars: impl IntoIterator<IntoIter = I>, options: ParserOptions) -> Self {
        Self::new(Rewind::new(IterSource::new(chars)), options)
    }
}

impl<S: CharSource> Scanner<S> {
    /// Creates a scanner reading from `source`.
    pub fn new(source: S, options: ParserOptions) -> Self {
        Self {
            source,
            cursor: Cursor::default(),
            options,
            depth: 0,
        }
    }

    /// The options handed to object and array builders.
    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// The current position.
    #[must_use]
    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    /// The last character returned by [`next`](Self::next), or [`END`] if
    /// nothing has been read yet.
    #[must_use]
    pub fn previous(&self) -> char {
        self.cursor.previous()
    }

    /// Consumes the scanner and returns its source.
    pub fn into_inner(self) -> S {
        self.source
    }

    // --- Cursor & pushback -------------------------------------------------

    /// Steps back one character so that the next call to [`next`](Self::next)
    /// returns it again.
    ///
    /// # Errors
    ///
    /// [`ScanError::MalformedState`] if a character is already pushed back or
    /// nothing has been read yet.
    pub fn back(&mut self) -> Result<()> {
        if self.cursor.has_pending() {
            return Err(ScanError::MalformedState("cannot step back twice"));
        }
        if self.cursor.position().index == 0 {
            return Err(ScanError::MalformedState(
                "cannot step back before the first character",
            ));
        }
        self.cursor.step_back();
        Ok(())
    }

    /// Whether the source is exhausted and no pushback is pending.
    #[must_use]
    pub fn end(&self) -> bool {
        self.cursor.eof() && !self.cursor.has_pending()
    }

    /// Whether at least one more character can be read. Nothing is consumed.
    ///
    /// # Errors
    ///
    /// Propagates source failures.
    pub fn more(&mut self) -> Result<bool> {
        self.next()?;
        if self.end() {
            return Ok(false);
        }
        self.back()?;
        Ok(true)
    }

    /// Returns the next character, or [`END`] once the source is exhausted.
    ///
    /// A NUL character read from the source also ends the stream.
    ///
    /// # Errors
    ///
    /// [`ScanError::Io`] if the source fails.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<char> {
        let ch = match self.cursor.take_pending() {
            Some(ch) => ch,
            None => self.source.read_char()?.unwrap_or(END),
        };
        self.cursor.advance(ch);
        Ok(ch)
    }

    /// Consumes one character and checks that it is `expected`.
    ///
    /// # Errors
    ///
    /// A syntax error naming both characters on mismatch.
    pub fn next_char(&mut self, expected: char) -> Result<char> {
        let ch = self.next()?;
        if ch != expected {
            return Err(self.syntax_error(format!(
                "expected '{}', saw '{}'",
                expected.escape_debug(),
                ch.escape_debug()
            )));
        }
        Ok(ch)
    }

    /// Consumes exactly `n` characters.
    ///
    /// # Errors
    ///
    /// `substring bounds error` if the stream ends first.
    pub fn next_n(&mut self, n: usize) -> Result<String> {
        let mut out = String::with_capacity(n);
        for _ in 0..n {
            let ch = self.next()?;
            if self.end() {
                return Err(self.syntax_error("substring bounds error"));
            }
            out.push(ch);
        }
        Ok(out)
    }

    /// Skips characters up to and including U+0020 and returns the first
    /// significant one, or [`END`].
    ///
    /// # Errors
    ///
    /// Propagates source failures.
    pub fn next_clean(&mut self) -> Result<char> {
        loop {
            let ch = self.next()?;
            if ch == END || ch > ' ' {
                return Ok(ch);
            }
        }
    }

    // --- Skip-ahead --------------------------------------------------------

    /// Skips forward until the next character would be `to`.
    ///
    /// Returns `to`, left unread, when it is found. Otherwise rewinds the
    /// source and the cursor to where they were and returns [`END`]; no input
    /// is consumed in that case.
    ///
    /// The source must support mark/reset over [`SKIP_LOOKAHEAD_LIMIT`]
    /// characters. The mark is released before this returns.
    ///
    /// # Errors
    ///
    /// [`ScanError::Io`] if the source cannot mark, read or reset.
    pub fn skip_to(&mut self, to: char) -> Result<char> {
        let checkpoint = self.cursor;
        self.source.mark(SKIP_LOOKAHEAD_LIMIT)?;
        // A pending pushback was read from the source before the mark; it is
        // restored from the checkpoint rather than replayed.
        loop {
            let ch = self.next()?;
            if ch == END {
                trace!(wanted = ?to, position = %checkpoint.position(), "skip_to: not found, rewinding");
                self.source.reset()?;
                self.source.unmark();
                self.cursor = checkpoint;
                return Ok(END);
            }
            if ch == to {
                break;
            }
        }
        self.source.unmark();
        self.back()?;
        Ok(to)
    }

    // --- Diagnostics -------------------------------------------------------

    /// Builds a syntax error at the current position.
    #[must_use]
    pub fn syntax_error(&self, message: impl Into<String>) -> ScanError {
        ScanError::Syntax {
            message: message.into(),
            position: self.position(),
        }
    }
}

impl<S> fmt::Display for Scanner<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.cursor.position(), f)
    }
}

impl<S> fmt::Debug for Scanner<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("cursor", &self.cursor)
            .field("options", &self.options)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}
