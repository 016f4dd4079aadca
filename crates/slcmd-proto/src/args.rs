//! Command arguments with typed, fallible coercion.
//!
//! [`ArgumentList`] is immutable once built; transformations such as
//! [`ArgumentList::splice`] return a new list.

use std::any::type_name;
use std::fmt;
use std::str::FromStr;

use crate::error::{ArgumentError, Result};

/// A single argument token.
///
/// Out-of-range lookups on an [`ArgumentList`] produce the empty argument
/// rather than failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Argument<'a>(&'a str);

impl<'a> Argument<'a> {
    /// Wrap a raw token.
    pub const fn new(raw: &'a str) -> Self {
        Self(raw)
    }

    /// The raw token text.
    pub const fn as_str(&self) -> &'a str {
        self.0
    }

    /// Whether this is the empty token (also returned for missing positions).
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse as a signed base-10 integer. An optional leading `+` or `-` is
    /// accepted; anything else that is not a digit fails.
    pub fn as_int(&self) -> Result<i64> {
        self.0.parse().map_err(|source| ArgumentError::InvalidInt {
            value: self.0.to_string(),
            source,
        })
    }

    /// Parse as a 64-bit float using standard decimal notation
    /// (`1.5`, `-2e3`, `inf`, `NaN`).
    pub fn as_float(&self) -> Result<f64> {
        self.0.parse().map_err(|source| ArgumentError::InvalidFloat {
            value: self.0.to_string(),
            source,
        })
    }

    /// Parse as a boolean.
    ///
    /// True: `1 t T TRUE true True`. False: `0 f F FALSE false False`.
    pub fn as_bool(&self) -> Result<bool> {
        match self.0 {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            other => Err(ArgumentError::InvalidBool {
                value: other.to_string(),
            }),
        }
    }

    /// Parse with any `FromStr` implementation.
    pub fn parse<T>(&self) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.0.parse().map_err(|e: T::Err| ArgumentError::Invalid {
            value: self.0.to_string(),
            expected: type_name::<T>(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for Argument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl AsRef<str> for Argument<'_> {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl PartialEq<str> for Argument<'_> {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Argument<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Ordered, positionally significant argument tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ArgumentList(Vec<String>);

impl ArgumentList {
    /// An empty list.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The argument at `index`, or the empty argument when out of bounds.
    pub fn get(&self, index: usize) -> Argument<'_> {
        self.0
            .get(index)
            .map(|s| Argument(s.as_str()))
            .unwrap_or_default()
    }

    /// Position of the first argument equal to `value`.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.0.iter().position(|s| s == value)
    }

    /// Whether any argument equals `value`.
    pub fn contains(&self, value: &str) -> bool {
        self.index_of(value).is_some()
    }

    /// A copy of this list with `count` elements removed starting at `start`.
    ///
    /// - `start` at or past the end: the list is returned unchanged.
    /// - `start + count` at or past the end: only the elements before `start`.
    /// - otherwise: the elements before `start` followed by those from
    ///   `start + count` on.
    pub fn splice(&self, start: usize, count: usize) -> Self {
        let len = self.0.len();
        if start >= len {
            return self.clone();
        }
        let end = start.saturating_add(count);
        if end >= len {
            return Self(self.0[..start].to_vec());
        }
        let mut kept = Vec::with_capacity(len - count);
        kept.extend_from_slice(&self.0[..start]);
        kept.extend_from_slice(&self.0[end..]);
        Self(kept)
    }

    /// Iterate arguments in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Argument<'_>> + '_ {
        self.0.iter().map(|s| Argument(s.as_str()))
    }

    /// Join all arguments with `separator`.
    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }

    /// The raw tokens.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consume the list, returning the raw tokens.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for ArgumentList {
    fn from(tokens: Vec<String>) -> Self {
        Self(tokens)
    }
}

impl From<&[&str]> for ArgumentList {
    fn from(tokens: &[&str]) -> Self {
        tokens.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> From<[&str; N]> for ArgumentList {
    fn from(tokens: [&str; N]) -> Self {
        tokens.iter().map(|s| s.to_string()).collect()
    }
}

impl FromIterator<String> for ArgumentList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ArgumentList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abcde() -> ArgumentList {
        ArgumentList::from(["a", "b", "c", "d", "e"])
    }

    #[test]
    fn test_get_in_and_out_of_bounds() {
        let list = abcde();
        assert_eq!(list.get(0), "a");
        assert_eq!(list.get(4), "e");
        assert!(list.get(5).is_empty());
        assert!(list.get(usize::MAX).is_empty());
        assert!(ArgumentList::new().get(0).is_empty());
    }

    #[test]
    fn test_index_of_and_contains() {
        let list = ArgumentList::from(["x", "y", "x"]);
        assert_eq!(list.index_of("x"), Some(0));
        assert_eq!(list.index_of("y"), Some(1));
        assert_eq!(list.index_of("z"), None);
        assert!(list.contains("y"));
        assert!(!list.contains("z"));
    }

    #[test]
    fn test_splice_middle() {
        assert_eq!(abcde().splice(1, 2), ArgumentList::from(["a", "d", "e"]));
    }

    #[test]
    fn test_splice_reaching_end_truncates() {
        assert_eq!(abcde().splice(4, 2), ArgumentList::from(["a", "b", "c", "d"]));
        assert_eq!(abcde().splice(3, 2), ArgumentList::from(["a", "b", "c"]));
        assert_eq!(abcde().splice(0, usize::MAX), ArgumentList::new());
    }

    #[test]
    fn test_splice_start_past_end_is_unchanged() {
        assert_eq!(abcde().splice(5, 1), abcde());
        assert_eq!(abcde().splice(9, 0), abcde());
    }

    #[test]
    fn test_splice_leaves_original_untouched() {
        let list = abcde();
        let _ = list.splice(0, 3);
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn test_as_bool() {
        for t in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(Argument::new(t).as_bool().unwrap(), "{t}");
        }
        for f in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!Argument::new(f).as_bool().unwrap(), "{f}");
        }
        for bad in ["yes", "no", "tRUE", "", " true"] {
            assert!(Argument::new(bad).as_bool().is_err(), "{bad:?}");
        }
    }

    #[test]
    fn test_as_int() {
        assert_eq!(Argument::new("42").as_int().unwrap(), 42);
        assert_eq!(Argument::new("-7").as_int().unwrap(), -7);
        assert_eq!(Argument::new("+7").as_int().unwrap(), 7);
        assert!(Argument::new("4.2").as_int().is_err());
        assert!(Argument::new("").as_int().is_err());
        assert!(Argument::new("0x10").as_int().is_err());
    }

    #[test]
    fn test_as_float() {
        assert_eq!(Argument::new("4.25").as_float().unwrap(), 4.25);
        assert_eq!(Argument::new("-1e3").as_float().unwrap(), -1000.0);
        assert!(Argument::new("four").as_float().is_err());
    }

    #[test]
    fn test_parse_custom_type() {
        let port: u16 = Argument::new("6667").parse().unwrap();
        assert_eq!(port, 6667);

        let err = Argument::new("70000").parse::<u16>().unwrap_err();
        assert_eq!(err.value(), "70000");
        assert!(matches!(err, ArgumentError::Invalid { expected: "u16", .. }));
    }

    #[test]
    fn test_join_and_iter() {
        let list = ArgumentList::from(["hello", "there"]);
        assert_eq!(list.join(" "), "hello there");
        let collected: Vec<&str> = list.iter().map(|a| a.as_str()).collect();
        assert_eq!(collected, vec!["hello", "there"]);
    }
}
