//! Record name validation.
//!
//! A record's name doubles as its file stem, so it must be usable as a single
//! path component on every platform:
//! - Must be non-empty and at most [`MAX_NAME_BYTES`] bytes
//! - Must not be `.` or `..`
//! - Must not contain `/`, `\`, or control characters (NUL included)

use crate::error::{StoreError, StoreResult};

/// Longest name that still fits a 255-byte file name once `.talk` is appended.
pub const MAX_NAME_BYTES: usize = 250;

/// Validate a record name, returning `Ok(())` if it can be used as a storage key.
///
/// # Examples
///
/// ```
/// use talk_store::names::validate_record_name;
///
/// assert!(validate_record_name("Greeting").is_ok());
/// assert!(validate_record_name("Grandpa's jokes").is_ok());
/// assert!(validate_record_name("").is_err());
/// assert!(validate_record_name("../escape").is_err());
/// ```
pub fn validate_record_name(name: &str) -> StoreResult<()> {
    let reject = |reason: &str| {
        Err(StoreError::InvalidName {
            name: name.to_string(),
            reason: reason.into(),
        })
    };

    if name.is_empty() {
        return reject("name must not be empty");
    }
    if name.len() > MAX_NAME_BYTES {
        return reject("name is too long");
    }
    if name == "." || name == ".." {
        return reject("name must not be a relative directory reference");
    }
    if name.contains(['/', '\\']) {
        return reject("name must not contain path separators");
    }
    if name.chars().any(char::is_control) {
        return reject("name must not contain control characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        for name in ["Greeting", "TestTalkFile", "héllo wörld", "a.b", "..hidden"] {
            assert!(validate_record_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_path_tricks() {
        for name in ["", ".", "..", "a/b", "a\\b", "nul\0byte", "tab\there"] {
            let err = validate_record_name(name).unwrap_err();
            assert!(matches!(err, StoreError::InvalidName { .. }), "{name:?}");
        }
    }

    #[test]
    fn length_limit() {
        assert!(validate_record_name(&"x".repeat(MAX_NAME_BYTES)).is_ok());
        assert!(validate_record_name(&"x".repeat(MAX_NAME_BYTES + 1)).is_err());
    }
}
