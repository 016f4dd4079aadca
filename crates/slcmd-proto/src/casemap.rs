//! Invocation case folding.
//!
//! When case-insensitive matching is enabled, invocation names are folded
//! with Unicode lowercase mapping both at registration and at lookup, so
//! `PING`, `Ping` and `ping` share one registry key.

use std::borrow::Cow;

/// Fold an invocation name to its lookup key.
///
/// Borrows the input when it is already lowercase.
pub fn fold_invocation(name: &str) -> Cow<'_, str> {
    if name.chars().all(|c| c.to_lowercase().eq(std::iter::once(c))) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(name.to_lowercase())
    }
}

/// Compare two invocation names after folding.
pub fn invocation_eq(a: &str, b: &str) -> bool {
    fold_invocation(a) == fold_invocation(b)
}
