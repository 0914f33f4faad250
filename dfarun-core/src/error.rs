//! Core error types.

use std::path::PathBuf;
use thiserror::Error;

/// What was wrong with a line of an automaton description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatErrorKind {
    #[error("missing initial state line")]
    MissingInitial,

    #[error("missing accepting state line")]
    MissingAccepting,

    #[error("transition line has no ':' after the source state")]
    MissingColon,

    #[error("transition line has no symbol/target pairs")]
    EmptyPairList,

    #[error("empty symbol/target pair")]
    EmptyPair,

    #[error("expected '<symbol> <target>', found {found} token(s)")]
    MalformedPair { found: usize },

    #[error("invalid state identifier '{token}'")]
    InvalidState { token: String },

    #[error("invalid symbol '{token}'")]
    InvalidSymbol { token: String },

    #[error("blank line")]
    BlankLine,
}

/// A description that violates the grammar.
///
/// `line` is 1-based; `text` is the raw offending line (empty when the
/// description ended before a required line).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}: '{text}'")]
pub struct FormatError {
    pub line: usize,
    pub text: String,
    pub kind: FormatErrorKind,
}

impl FormatError {
    pub fn new(line: usize, text: impl Into<String>, kind: FormatErrorKind) -> Self {
        Self {
            line,
            text: text.into(),
            kind,
        }
    }
}

/// Errors from loading an automaton.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid description: {0}")]
    Format(#[from] FormatError),

    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    /// Returns a stable error code for reports.
    pub fn error_code(&self) -> &'static str {
        match self {
            CoreError::Format(_) => "FORMAT_ERROR",
            CoreError::Io { .. } => "IO_ERROR",
        }
    }

    /// Returns the format error, if this is one.
    pub fn as_format(&self) -> Option<&FormatError> {
        match self {
            CoreError::Format(e) => Some(e),
            CoreError::Io { .. } => None,
        }
    }
}
