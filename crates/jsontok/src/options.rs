/// Nesting limit used by [`ParserOptions::default`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration handed through the scanner to the object and array builders.
///
/// The scanner itself never looks at these options; they only shape how
/// composite values are assembled.
///
/// # Examples
///
/// ```rust
/// use jsontok::{ParserOptions, Scanner};
///
/// let options = ParserOptions {
///     ignore_null_value: true,
///     ..Default::default()
/// };
/// let mut scanner = Scanner::from_text(r#"{"a": null, "b": 1}"#, options);
/// let value = scanner.next_value().unwrap();
/// assert_eq!(value.as_object().unwrap().len(), 1);
/// ```
///
/// # Default
///
/// `max_depth` is [`DEFAULT_MAX_DEPTH`]; all flags default to `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Maximum nesting of objects and arrays.
    ///
    /// Input nested deeper than this fails with `object depth too large` or
    /// `array depth too large` instead of exhausting the stack.
    ///
    /// Containers are built recursively, one set of stack frames per level,
    /// so this only protects the stack while it stays well below what the
    /// calling thread can hold. A few thousand levels is the practical
    /// ceiling on a default 2 MiB thread stack; `usize::MAX` disables the
    /// check and deep input then overflows the stack and aborts.
    ///
    /// # Default
    ///
    /// [`DEFAULT_MAX_DEPTH`]
    pub max_depth: usize,

    /// Whether object members whose value is `null` are dropped.
    ///
    /// Array elements are always kept, so indices stay stable.
    ///
    /// # Default
    ///
    /// `false`
    pub ignore_null_value: bool,

    /// Whether a key that appears twice in one object is a syntax error.
    ///
    /// When `false`, the later member replaces the earlier one and keeps the
    /// earlier one's place in the key order.
    ///
    /// # Default
    ///
    /// `false`
    pub reject_duplicate_keys: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            ignore_null_value: false,
            reject_duplicate_keys: false,
        }
    }
}
