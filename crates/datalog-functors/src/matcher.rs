//! Tri-state regular expression matching.
//!
//! Patterns use the `regex` crate syntax and are searched unanchored, so
//! `abc` matches `xxabcxx` and the empty pattern matches everything.
//! Every call compiles its own pattern; nothing is cached or shared.
//!
//! Subjects are searched as bytes and need not be valid UTF-8, but Unicode
//! mode is on by default: `.`, `\w` and other classes only match whole UTF-8
//! encoded characters, so `^.$` does not match the single byte `0xFF`.
//! Literal bytes still match around invalid sequences, and a pattern can opt
//! into byte-level classes with `(?-u)`, e.g. `(?-u)^.$` or `(?-u)\xFF`.

use regex::bytes::{Regex, RegexBuilder};
use regex_syntax::ast::{self, parse::ParserBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{LimitKind, MatchError};

/// Default ceiling on the compiled program size (10 MiB).
const DEFAULT_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Default capacity of the lazy DFA cache (2 MiB).
const DEFAULT_DFA_SIZE_LIMIT: usize = 2 * (1 << 20);

/// Default maximum nesting depth of groups and repetitions.
const DEFAULT_NEST_LIMIT: u32 = 250;

/// Result of evaluating a pattern against a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// The pattern compiled and the subject does not satisfy it.
    NoMatch,
    /// The pattern compiled and the subject satisfies it.
    Match,
    /// The pattern could not be compiled or evaluated.
    Error,
}

impl MatchOutcome {
    /// Numeric code handed to the host engine.
    pub const fn code(self) -> i32 {
        match self {
            MatchOutcome::NoMatch => 0,
            MatchOutcome::Match => 1,
            MatchOutcome::Error => 2,
        }
    }

    /// Inverse of [`MatchOutcome::code`].
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(MatchOutcome::NoMatch),
            1 => Some(MatchOutcome::Match),
            2 => Some(MatchOutcome::Error),
            _ => None,
        }
    }

    /// Whether the predicate holds.
    pub const fn is_match(self) -> bool {
        matches!(self, MatchOutcome::Match)
    }

    /// Name used in CLI and JSON output.
    pub const fn as_str(self) -> &'static str {
        match self {
            MatchOutcome::NoMatch => "no_match",
            MatchOutcome::Match => "match",
            MatchOutcome::Error => "error",
        }
    }
}

impl From<Result<bool, MatchError>> for MatchOutcome {
    fn from(result: Result<bool, MatchError>) -> Self {
        match result {
            Ok(true) => MatchOutcome::Match,
            Ok(false) => MatchOutcome::NoMatch,
            Err(_) => MatchOutcome::Error,
        }
    }
}

/// Resource limits applied when compiling a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Maximum size in bytes of the compiled program.
    pub size_limit: usize,
    /// Capacity in bytes of the lazy DFA cache.
    ///
    /// Exceeding it never fails a search; the engine falls back to a slower
    /// strategy, so this only tunes speed.
    pub dfa_size_limit: usize,
    /// Maximum nesting depth of the parsed pattern.
    pub nest_limit: u32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            size_limit: DEFAULT_SIZE_LIMIT,
            dfa_size_limit: DEFAULT_DFA_SIZE_LIMIT,
            nest_limit: DEFAULT_NEST_LIMIT,
        }
    }
}

impl MatcherConfig {
    pub fn with_size_limit(mut self, limit: usize) -> Self {
        self.size_limit = limit;
        self
    }

    pub fn with_dfa_size_limit(mut self, limit: usize) -> Self {
        self.dfa_size_limit = limit;
        self
    }

    pub fn with_nest_limit(mut self, limit: u32) -> Self {
        self.nest_limit = limit;
        self
    }
}

/// Stateless matcher; holds only its compile limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternMatcher {
    config: MatcherConfig,
}

impl PatternMatcher {
    /// Create a matcher with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a matcher with custom limits.
    pub fn with_config(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Compile the pattern without matching anything.
    pub fn check_pattern(&self, pattern: &str) -> Result<(), MatchError> {
        self.compile(pattern).map(drop)
    }

    /// Compile `pattern` and test whether it occurs anywhere in `subject`.
    ///
    /// The subject need not be valid UTF-8; see the module docs for how
    /// Unicode classes treat invalid bytes.
    pub fn try_match(&self, pattern: &str, subject: &[u8]) -> Result<bool, MatchError> {
        let regex = self.compile(pattern)?;
        Ok(regex.is_match(subject))
    }

    /// Evaluate `pattern` against `subject`, collapsing failures into
    /// [`MatchOutcome::Error`].
    pub fn evaluate(&self, pattern: &str, subject: &[u8]) -> MatchOutcome {
        let outcome = MatchOutcome::from(self.try_match(pattern, subject));
        trace!(pattern, outcome = outcome.as_str(), "evaluated pattern");
        outcome
    }

    fn compile(&self, pattern: &str) -> Result<Regex, MatchError> {
        self.check_nesting(pattern)?;

        RegexBuilder::new(pattern)
            .size_limit(self.config.size_limit)
            .dfa_size_limit(self.config.dfa_size_limit)
            .nest_limit(self.config.nest_limit)
            .build()
            .map_err(|e| {
                let err = MatchError::from(e);
                debug!(pattern, error = %err, "pattern failed to compile");
                err
            })
    }

    /// Reject patterns nested deeper than the configured limit.
    ///
    /// The `regex` builder reports this as a plain syntax error, so the AST is
    /// parsed first to tell it apart. Other parse errors are left for the
    /// builder to report.
    fn check_nesting(&self, pattern: &str) -> Result<(), MatchError> {
        let limit = self.config.nest_limit;
        match ParserBuilder::new().nest_limit(limit).build().parse(pattern) {
            Err(e) if matches!(e.kind(), ast::ErrorKind::NestLimitExceeded(_)) => {
                debug!(pattern, limit, "pattern exceeds nesting limit");
                Err(MatchError::ResourceLimit {
                    kind: LimitKind::Nesting,
                    limit: limit as usize,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Match `subject` against `pattern` with default limits.
pub fn match_pattern(pattern: &str, subject: &str) -> MatchOutcome {
    PatternMatcher::new().evaluate(pattern, subject.as_bytes())
}
