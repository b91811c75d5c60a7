//! Error types for pattern matching.

use std::fmt;

use thiserror::Error;

/// Which compile limit a pattern ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    /// Size in bytes of the compiled program.
    ProgramSize,
    /// Depth of nested groups and repetitions.
    Nesting,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitKind::ProgramSize => write!(f, "compiled size limit (bytes)"),
            LimitKind::Nesting => write!(f, "nesting depth limit"),
        }
    }
}

/// Reasons a pattern could not be evaluated against a subject.
///
/// The C boundary collapses every variant into the single error code;
/// Rust callers keep the distinction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The pattern is not valid in the supported syntax.
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// Compiling the pattern exceeded a configured engine limit.
    #[error("pattern exceeds {kind} of {limit}")]
    ResourceLimit { kind: LimitKind, limit: usize },

    /// An argument received across the C boundary was unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<regex::Error> for MatchError {
    fn from(err: regex::Error) -> Self {
        match err {
            regex::Error::CompiledTooBig(limit) => MatchError::ResourceLimit {
                kind: LimitKind::ProgramSize,
                limit,
            },
            other => MatchError::InvalidPattern(other.to_string()),
        }
    }
}
