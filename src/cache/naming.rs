//! Parameter Naming
//!
//! Maps logical cache keys to fully-qualified parameter names. The escape rule
//! is part of the storage format: changing it orphans existing entries.

use std::borrow::Cow;

/// Returns true for characters allowed verbatim in a parameter name.
fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '/')
}

/// Replaces every character outside `[A-Za-z0-9_.\-/]` with `_`.
///
/// Distinct keys can collide once escaped (`a b` and `a:b` both become `a_b`).
pub fn escape_key(key: &str) -> Cow<'_, str> {
    if key.chars().all(is_safe_char) {
        Cow::Borrowed(key)
    } else {
        Cow::Owned(
            key.chars()
                .map(|c| if is_safe_char(c) { c } else { '_' })
                .collect(),
        )
    }
}

/// Builds `base_path/escaped_key`. The base path is trusted and used as given.
pub fn parameter_name(base_path: &str, key: &str) -> String {
    format!("{}/{}", base_path, escape_key(key))
}
