//! Checks for identifiers that end up as path components.
//!
//! Host names become directory and file names and download requests carry
//! a file name; both are joined onto a base directory, so anything that
//! could escape it or reach a shell is refused up front.

use crate::error::{CaError, Result};

/// Returns `true` if `name` is non-empty, consists only of ASCII
/// alphanumerics, `.`, `_` and `-`, and does not contain `..`.
pub fn is_safe(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Like [`is_safe`], but fails with [`CaError::UnsafeIdentifier`].
pub fn ensure_safe(name: &str) -> Result<&str> {
    if is_safe(name) {
        Ok(name)
    } else {
        Err(CaError::UnsafeIdentifier(name.to_string()))
    }
}
