//! Position and pushback bookkeeping.
use core::fmt;

/// The end-of-stream sentinel returned by the character primitives.
pub const END: char = '\0';

/// A location in the input, as reported in diagnostics.
///
/// `index` counts characters consumed so far. `line` starts at 1. `column`
/// is 1 before anything has been read on the first line and 0 right after a
/// line terminator, so the first character of each line is column 1.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Number of characters consumed.
    pub index: u64,
    /// 1-based line number.
    pub line: u64,
    /// Column within the current line.
    pub column: u64,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            " at {} [character {} line {}]",
            self.index, self.column, self.line
        )
    }
}

/// Line/column state that `back()` must be able to restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineState {
    line: u64,
    column: u64,
    after_cr: bool,
}

impl LineState {
    /// Advances over `ch`. A `\n` directly after `\r` closes the same line
    /// break and is not counted again.
    fn advance(self, ch: char) -> Self {
        if self.after_cr {
            Self {
                line: self.line + 1,
                column: u64::from(ch != '\n'),
                after_cr: ch == '\r',
            }
        } else if ch == '\n' {
            Self {
                line: self.line + 1,
                column: 0,
                after_cr: false,
            }
        } else {
            Self {
                line: self.line,
                column: self.column + 1,
                after_cr: ch == '\r',
            }
        }
    }
}

/// The mutable state behind a scanner: where we are, what was read last, and
/// whether one character is waiting to be re-read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    index: u64,
    lines: LineState,
    /// Line state before the most recent advance, restored by `step_back`.
    undo: LineState,
    previous: char,
    pending: Option<char>,
    eof: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        let lines = LineState {
            line: 1,
            column: 1,
            after_cr: false,
        };
        Self {
            index: 0,
            lines,
            undo: lines,
            previous: END,
            pending: None,
            eof: false,
        }
    }
}

impl Cursor {
    /// Takes the pending pushback, if any.
    #[inline]
    pub(crate) fn take_pending(&mut self) -> Option<char> {
        self.pending.take()
    }

    /// Records that `ch` was handed to the caller. `END` marks end of stream.
    pub(crate) fn advance(&mut self, ch: char) {
        self.index += 1;
        self.undo = self.lines;
        self.lines = self.lines.advance(ch);
        self.previous = ch;
        self.eof = ch == END;
    }

    /// Undoes the most recent `advance`. The caller has checked that nothing
    /// is pending and at least one character was read.
    pub(crate) fn step_back(&mut self) {
        self.index -= 1;
        self.lines = self.undo;
        self.pending = Some(self.previous);
        self.eof = false;
    }

    #[inline]
    pub(crate) fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[inline]
    pub(crate) fn eof(&self) -> bool {
        self.eof
    }

    #[inline]
    pub(crate) fn previous(&self) -> char {
        self.previous
    }

    pub(crate) fn position(&self) -> Position {
        Position {
            index: self.index,
            line: self.lines.line,
            column: self.lines.column,
        }
    }
}
