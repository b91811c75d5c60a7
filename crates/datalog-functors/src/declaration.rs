//! Soufflé declarations for the exported functors.

/// Symbol name of the regex functor, as referenced by `@regex_match` in rules.
pub const FUNCTOR_NAME: &str = "regex_match";

/// The `.functor` line a Soufflé program needs before calling `@regex_match`.
///
/// The result is a `number` rather than a boolean so rules can tell an
/// unevaluable pattern (`2`) apart from a failed match (`0`):
///
/// ```text
/// matches(p, s) :- candidate(p, s), @regex_match(p, s) = 1.
/// bad_pattern(p) :- candidate(p, s), @regex_match(p, s) = 2.
/// ```
pub fn functor_declaration() -> String {
    format!(".functor {}(pattern: symbol, subject: symbol): number", FUNCTOR_NAME)
}
