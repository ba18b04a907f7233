use tracing::debug;

use super::{Scanner, strings::trim_control};
use crate::{
    builder::{self, Overflow},
    coerce::coerce_literal,
    error::Result,
    source::CharSource,
    value::Value,
};

/// Characters that end an unquoted literal.
const RESERVED: &[char] = &[',', ':', ']', '}', '/', '\\', '"', '[', '{', ';', '=', '#'];

impl<S: CharSource> Scanner<S> {
    /// Reads the next value: a quoted string, an object, an array, or an
    /// unquoted literal.
    ///
    /// Unquoted text runs up to the first control character or one of
    /// `, : ] } / \ " [ { ; = #` and is coerced with
    /// [`coerce_literal`](crate::coerce_literal), so `true`, `null` and `42`
    /// come back typed and anything else comes back as a string.
    ///
    /// # Errors
    ///
    /// - `missing value` if no literal text is present.
    /// - `object depth too large` / `array depth too large` past
    ///   [`ParserOptions::max_depth`](crate::ParserOptions::max_depth).
    /// - Any error raised while reading a string or building a container.
    pub fn next_value(&mut self) -> Result<Value> {
        let c = self.next_clean()?;
        match c {
            '"' | '\'' => return self.next_string(c).map(Value::String),
            '{' => {
                self.back()?;
                return builder::parse_object(self).map_err(|e| self.translate_overflow(e));
            }
            '[' => {
                self.back()?;
                return builder::parse_array(self).map_err(|e| self.translate_overflow(e));
            }
            _ => {}
        }

        self.back()?;
        let text = self.next_unquoted()?;
        if text.is_empty() {
            return Err(self.syntax_error("missing value"));
        }
        Ok(coerce_literal(&text))
    }

    /// Accumulates an unquoted literal without interpreting it. The stopping
    /// character is pushed back.
    pub(crate) fn next_unquoted(&mut self) -> Result<String> {
        let mut out = String::new();
        let mut c = self.next()?;
        while c >= ' ' && !RESERVED.contains(&c) {
            out.push(c);
            c = self.next()?;
        }
        self.back()?;
        Ok(trim_control(&out).to_owned())
    }

    fn translate_overflow(&self, err: Overflow) -> crate::ScanError {
        match err {
            Overflow::Object => {
                debug!(depth = self.depth, "object nesting limit reached");
                self.syntax_error("object depth too large")
            }
            Overflow::Array => {
                debug!(depth = self.depth, "array nesting limit reached");
                self.syntax_error("array depth too large")
            }
            Overflow::Scan(e) => e,
        }
    }
}
