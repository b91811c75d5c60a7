//! Command-line harness for the datalog functors.
//!
//! Subcommands:
//! - `match`: evaluate a pattern against a subject exactly as `@regex_match` would
//! - `check`: compile a pattern and report why it is rejected
//! - `declaration`: print the `.functor` line for Soufflé programs

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use datalog_functors::{MatchOutcome, MatcherConfig, PatternMatcher, functor_declaration};
use miette::Result;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "datalog-functors")]
#[command(about = "Exercise native Soufflé functors from the shell", long_about = None)]
struct Cli {
    /// Maximum compiled pattern size in bytes
    #[arg(long, global = true, env = "DATALOG_FUNCTORS_SIZE_LIMIT")]
    size_limit: Option<usize>,

    /// Maximum nesting depth of a pattern
    #[arg(long, global = true, env = "DATALOG_FUNCTORS_NEST_LIMIT")]
    nest_limit: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a pattern against a subject (exit status 0 = match, 1 = no match, 2 = error)
    Match {
        /// Regular expression
        pattern: String,

        /// Text to search
        subject: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that a pattern compiles
    Check {
        /// Regular expression
        pattern: String,
    },

    /// Print the Soufflé functor declaration
    Declaration,
}

#[derive(Debug, Serialize)]
struct MatchReport {
    outcome: MatchOutcome,
    code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Cli {
    fn matcher_config(&self) -> MatcherConfig {
        let mut config = MatcherConfig::default();
        if let Some(limit) = self.size_limit {
            config = config.with_size_limit(limit);
        }
        if let Some(limit) = self.nest_limit {
            config = config.with_nest_limit(limit);
        }
        config
    }
}

fn run_match(matcher: &PatternMatcher, pattern: &str, subject: &str) -> MatchReport {
    let result = matcher.try_match(pattern, subject.as_bytes());
    let error = result.as_ref().err().map(|e| e.to_string());
    let outcome = MatchOutcome::from(result);
    MatchReport {
        outcome,
        code: outcome.code(),
        error,
    }
}

/// Process exit status for a match outcome, following `grep`.
fn exit_status(outcome: MatchOutcome) -> u8 {
    match outcome {
        MatchOutcome::Match => 0,
        MatchOutcome::NoMatch => 1,
        MatchOutcome::Error => 2,
    }
}

fn run_check(matcher: &PatternMatcher, pattern: &str) -> Result<()> {
    matcher
        .check_pattern(pattern)
        .map_err(|e| miette::miette!("pattern rejected: {}", e))
}

fn main() -> Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "datalog_functors=warn".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.matcher_config();
    debug!(?config, "matcher configuration");
    let matcher = PatternMatcher::with_config(config);

    match cli.command {
        Commands::Match {
            pattern,
            subject,
            json,
        } => {
            let report = run_match(&matcher, &pattern, &subject);
            if json {
                let out = serde_json::to_string(&report)
                    .map_err(|e| miette::miette!("failed to serialize result: {}", e))?;
                println!("{}", out);
            } else {
                println!("{} ({})", report.outcome.as_str(), report.code);
                if let Some(error) = &report.error {
                    eprintln!("{}", error);
                }
            }
            Ok(ExitCode::from(exit_status(report.outcome)))
        }
        Commands::Check { pattern } => {
            run_check(&matcher, &pattern)?;
            println!("ok");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Declaration => {
            println!("{}", functor_declaration());
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_limits_override_defaults() {
        let cli = Cli::parse_from([
            "datalog-functors",
            "--size-limit",
            "4096",
            "match",
            "a",
            "b",
            "--nest-limit",
            "12",
        ]);
        let config = cli.matcher_config();
        assert_eq!(config.size_limit, 4096);
        assert_eq!(config.nest_limit, 12);
        assert_eq!(config.dfa_size_limit, MatcherConfig::default().dfa_size_limit);
    }

    #[test]
    fn test_nest_limit_falls_back_to_env() {
        // SAFETY: no other test reads or writes this variable.
        unsafe { std::env::set_var("DATALOG_FUNCTORS_NEST_LIMIT", "7") };
        let cli = Cli::parse_from(["datalog-functors", "check", "(a)"]);
        unsafe { std::env::remove_var("DATALOG_FUNCTORS_NEST_LIMIT") };

        assert_eq!(cli.matcher_config().nest_limit, 7);
    }

    #[test_case(MatchOutcome::Match, 0 ; "match exits zero")]
    #[test_case(MatchOutcome::NoMatch, 1 ; "no match exits one")]
    #[test_case(MatchOutcome::Error, 2 ; "error exits two")]
    fn test_exit_status(outcome: MatchOutcome, expected: u8) {
        assert_eq!(exit_status(outcome), expected);
    }

    #[test]
    fn test_check_accepts_valid_pattern() {
        assert!(run_check(&PatternMatcher::new(), "^[a-z]+$").is_ok());
    }

    #[test]
    fn test_check_rejects_bad_pattern() {
        let err = run_check(&PatternMatcher::new(), "[a-").unwrap_err();
        assert!(err.to_string().starts_with("pattern rejected: invalid pattern"));
    }

    #[test]
    fn test_check_reports_nesting_limit() {
        let config = MatcherConfig::default().with_nest_limit(2);
        let err = run_check(&PatternMatcher::with_config(config), "(((a)))").unwrap_err();
        assert_eq!(
            err.to_string(),
            "pattern rejected: pattern exceeds nesting depth limit of 2"
        );
    }

    #[test]
    fn test_declaration_subcommand_parses() {
        let cli = Cli::parse_from(["datalog-functors", "declaration"]);
        assert!(matches!(cli.command, Commands::Declaration));
        assert_eq!(
            functor_declaration(),
            ".functor regex_match(pattern: symbol, subject: symbol): number"
        );
    }

    #[test]
    fn test_report_carries_error_text() {
        let report = run_match(&PatternMatcher::new(), "(", "abc");
        assert_eq!(report.outcome, MatchOutcome::Error);
        assert_eq!(report.code, 2);
        assert!(report.error.unwrap().starts_with("invalid pattern"));
    }

    #[test]
    fn test_report_json_shape() {
        let report = run_match(&PatternMatcher::new(), "abc", "xxabcxx");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json, serde_json::json!({ "outcome": "match", "code": 1 }));
    }
}
