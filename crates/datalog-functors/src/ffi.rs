//! C ABI exported to Soufflé.
//!
//! Soufflé calls stateless functors with `symbol` arguments as
//! NUL-terminated strings and reads a `number` (32-bit signed) back.
//! The encoding below must stay exactly `0`/`1`/`2`.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic;

use tracing::warn;

use crate::{MatchError, MatchOutcome, PatternMatcher};

/// Subject does not match the pattern.
pub const NO_MATCH: i32 = MatchOutcome::NoMatch.code();
/// Subject matches the pattern.
pub const MATCH: i32 = MatchOutcome::Match.code();
/// Pattern could not be compiled or evaluated.
pub const ERROR: i32 = MatchOutcome::Error.code();

/// Test whether `subject` contains a match for `pattern`.
///
/// Returns [`MATCH`], [`NO_MATCH`] or [`ERROR`]. A null argument, a pattern
/// that is not UTF-8, a pattern that fails to compile and a panic inside the
/// matcher all yield [`ERROR`]. The subject is matched as raw bytes.
///
/// # Safety
/// Non-null arguments must point to NUL-terminated strings that stay valid
/// for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn regex_match(pattern: *const c_char, subject: *const c_char) -> i32 {
    let result = panic::catch_unwind(|| {
        // SAFETY: forwarded from this function's contract.
        let (pattern, subject) = unsafe { borrow_args(pattern, subject) }?;
        PatternMatcher::new().try_match(pattern, subject)
    });

    match result {
        Ok(result) => MatchOutcome::from(result).code(),
        Err(_) => {
            warn!("regex matcher panicked");
            ERROR
        }
    }
}

/// Borrow the host's strings without copying them.
///
/// # Safety
/// Same contract as [`regex_match`].
unsafe fn borrow_args<'a>(
    pattern: *const c_char,
    subject: *const c_char,
) -> Result<(&'a str, &'a [u8]), MatchError> {
    if pattern.is_null() {
        return Err(MatchError::InvalidInput("pattern is null".to_string()));
    }
    if subject.is_null() {
        return Err(MatchError::InvalidInput("subject is null".to_string()));
    }

    // SAFETY: both pointers are non-null and NUL-terminated per the contract.
    let (pattern, subject) = unsafe { (CStr::from_ptr(pattern), CStr::from_ptr(subject)) };

    let pattern = pattern
        .to_str()
        .map_err(|e| MatchError::InvalidInput(format!("pattern is not UTF-8: {}", e)))?;

    Ok((pattern, subject.to_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::ptr;

    fn call(pattern: &[u8], subject: &[u8]) -> i32 {
        let pattern = CString::new(pattern).unwrap();
        let subject = CString::new(subject).unwrap();
        unsafe { regex_match(pattern.as_ptr(), subject.as_ptr()) }
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(NO_MATCH, 0);
        assert_eq!(MATCH, 1);
        assert_eq!(ERROR, 2);
    }

    #[test]
    fn test_basic_outcomes() {
        assert_eq!(call(b"abc", b"xxabcxx"), MATCH);
        assert_eq!(call(b"zzz", b"abc"), NO_MATCH);
        assert_eq!(call(b"(", b"abc"), ERROR);
        assert_eq!(call(b"", b""), MATCH);
    }

    #[test]
    fn test_null_arguments_are_errors() {
        let s = CString::new("abc").unwrap();
        unsafe {
            assert_eq!(regex_match(ptr::null(), s.as_ptr()), ERROR);
            assert_eq!(regex_match(s.as_ptr(), ptr::null()), ERROR);
            assert_eq!(regex_match(ptr::null(), ptr::null()), ERROR);
        }
    }

    #[test]
    fn test_non_utf8_pattern_is_error() {
        assert_eq!(call(b"\xffabc", b"abc"), ERROR);
    }

    #[test]
    fn test_non_utf8_subject_is_matched() {
        assert_eq!(call(b"abc", b"\xffabc"), MATCH);
        assert_eq!(call(b"zzz", b"\xffabc"), NO_MATCH);
    }

    #[test]
    fn test_borrow_args_reports_cause() {
        let s = CString::new("abc").unwrap();
        let err = unsafe { borrow_args(ptr::null(), s.as_ptr()) }.unwrap_err();
        assert_eq!(err, MatchError::InvalidInput("pattern is null".to_string()));
    }
}
