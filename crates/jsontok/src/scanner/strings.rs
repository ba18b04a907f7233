//! Quoted strings and delimiter-bounded fields.
use super::{END, Scanner};
use crate::{error::Result, source::CharSource};

/// Trims characters up to and including U+0020 from both ends.
pub(crate) fn trim_control(s: &str) -> &str {
    s.trim_matches(|c: char| c <= ' ')
}

/// Collects the characters of a quoted string, pairing UTF‑16 surrogate
/// escapes into supplementary characters.
#[derive(Default)]
struct StringBuf {
    out: String,
    high: Option<u16>,
}

impl StringBuf {
    fn push(&mut self, ch: char) {
        self.flush_high();
        self.out.push(ch);
    }

    fn push_unit(&mut self, unit: u16) {
        match unit {
            0xD800..=0xDBFF => {
                self.flush_high();
                self.high = Some(unit);
            }
            0xDC00..=0xDFFF => match self.high.take() {
                Some(high) => {
                    let code = 0x1_0000
                        + ((u32::from(high) - 0xD800) << 10)
                        + (u32::from(unit) - 0xDC00);
                    self.out
                        .push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                None => self.out.push(char::REPLACEMENT_CHARACTER),
            },
            _ => self.push(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER)),
        }
    }

    /// A high surrogate not followed by a low one cannot be represented.
    fn flush_high(&mut self) {
        if self.high.take().is_some() {
            self.out.push(char::REPLACEMENT_CHARACTER);
        }
    }

    fn finish(mut self) -> String {
        self.flush_high();
        self.out
    }
}

impl<S: CharSource> Scanner<S> {
    /// Reads a string up to the closing `quote`, decoding escapes.
    ///
    /// The opening quote must already have been consumed. Single quotes are
    /// accepted as well as double quotes, and raw line breaks inside the
    /// string are kept as they are.
    ///
    /// `\uXXXX` escapes are UTF‑16 code units: a surrogate pair decodes to one
    /// character and an unpaired surrogate decodes to U+FFFD.
    ///
    /// # Errors
    ///
    /// - `unterminated string` if the stream ends first.
    /// - `illegal escape` for an unknown escape or non-hex `\u` digits.
    /// - `substring bounds error` if the stream ends inside a `\u` escape.
    pub fn next_string(&mut self, quote: char) -> Result<String> {
        let mut buf = StringBuf::default();
        loop {
            match self.next()? {
                END => return Err(self.syntax_error("unterminated string")),
                '\\' => match self.next()? {
                    'b' => buf.push('\u{8}'),
                    't' => buf.push('\t'),
                    'n' => buf.push('\n'),
                    'f' => buf.push('\u{c}'),
                    'r' => buf.push('\r'),
                    'u' => {
                        let hex = self.next_n(4)?;
                        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                            return Err(self.syntax_error("illegal escape"));
                        }
                        let unit = u16::from_str_radix(&hex, 16)
                            .map_err(|_| self.syntax_error("illegal escape"))?;
                        buf.push_unit(unit);
                    }
                    c @ ('"' | '\'' | '\\' | '/') => buf.push(c),
                    _ => return Err(self.syntax_error("illegal escape")),
                },
                c if c == quote => return Ok(buf.finish()),
                c => buf.push(c),
            }
        }
    }

    /// Reads up to, but not including, `delimiter` or the end of the line.
    ///
    /// The character that stopped the scan is pushed back unless it is the
    /// end of the stream. The result is trimmed.
    ///
    /// # Errors
    ///
    /// Propagates source failures.
    pub fn next_to(&mut self, delimiter: char) -> Result<String> {
        self.next_to_matching(|c| c == delimiter)
    }

    /// Like [`next_to`](Self::next_to), stopping at any character of
    /// `delimiters`.
    ///
    /// # Errors
    ///
    /// Propagates source failures.
    pub fn next_to_any(&mut self, delimiters: &str) -> Result<String> {
        self.next_to_matching(|c| delimiters.contains(c))
    }

    fn next_to_matching(&mut self, is_delimiter: impl Fn(char) -> bool) -> Result<String> {
        let mut out = String::new();
        loop {
            let c = self.next()?;
            if c == END || c == '\n' || c == '\r' || is_delimiter(c) {
                if c != END {
                    self.back()?;
                }
                return Ok(trim_control(&out).to_owned());
            }
            out.push(c);
        }
    }
}
