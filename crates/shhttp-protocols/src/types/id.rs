//! Identifier rules.

use crate::error::{JobError, Result};

/// Check that a caller-supplied identifier can be used as a storage key.
///
/// Identifiers are file names inside a store root: they must not be empty,
/// must not contain path separators or NUL, and must not start with `.`
/// (hidden names are reserved for in-flight writes).
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(JobError::Validation("id must not be empty".to_string()));
    }
    if id.starts_with('.') {
        return Err(JobError::Validation(format!(
            "id '{}' must not start with '.'",
            id
        )));
    }
    if id.chars().any(|c| c == '/' || c == '\\' || c == '\0') {
        return Err(JobError::Validation(format!(
            "id '{}' contains a path separator",
            id.escape_default()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_generated_shape() {
        assert!(validate_id("1700000000000000000-0f8fad5b-d9cb-469f-a165-70867728950e").is_ok());
        assert!(validate_id("nightly_backup").is_ok());
    }

    #[test]
    fn test_rejects_unsafe_ids() {
        for id in ["", ".", "..", ".hidden", "a/b", "..\\x", "nul\0byte"] {
            let err = validate_id(id).unwrap_err();
            assert!(err.is_validation(), "{id:?}");
        }
    }
}
