//! Native functors for Soufflé datalog.
//!
//! This crate provides:
//! - A tri-state regular expression matcher (match, no match, error)
//! - The `regex_match` C symbol Soufflé calls as `@regex_match(pattern, subject)`
//! - The `.functor` declaration programs include to use it
//!
//! Built as a `cdylib`, the library is loaded by Soufflé with
//! `-L <dir> -l datalog_functors`.

mod declaration;
mod error;
pub mod ffi;
mod matcher;

pub use declaration::{FUNCTOR_NAME, functor_declaration};
pub use error::{LimitKind, MatchError};
pub use matcher::{MatchOutcome, MatcherConfig, PatternMatcher, match_pattern};
