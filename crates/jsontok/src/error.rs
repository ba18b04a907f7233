use std::io;

use thiserror::Error;

use crate::scanner::Position;

/// Errors produced while scanning.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Malformed input at a known position.
    #[error("{message}{position}")]
    Syntax {
        /// What went wrong, without the position suffix.
        message: String,
        /// Where the scanner was when the error was raised.
        position: Position,
    },
    /// The scanner was driven incorrectly by its caller, e.g. stepping back
    /// twice in a row. This is a bug in the caller, not in the input.
    #[error("malformed scanner state: {0}")]
    MalformedState(&'static str),
    /// The character source failed to read, mark or reset.
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
}

impl ScanError {
    /// Returns the position attached to a syntax error.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            ScanError::Syntax { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Returns the bare message of a syntax error.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            ScanError::Syntax { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Returns `true` for malformed input.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, ScanError::Syntax { .. })
    }

    /// Returns `true` when the scanner was misused by its caller.
    #[must_use]
    pub fn is_malformed_state(&self) -> bool {
        matches!(self, ScanError::MalformedState(_))
    }

    /// Returns `true` when the source failed.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, ScanError::Io(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = ScanError> = core::result::Result<T, E>;
