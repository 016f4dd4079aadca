//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Longest accepted global prefix, in characters.
pub const MAX_PREFIX_CHARS: usize = 32;

/// Validation errors for configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("prefix must not contain whitespace, got {0:?}")]
    PrefixWhitespace(String),
    #[error("prefix must not contain '\"', got {0:?}")]
    PrefixQuote(String),
    #[error("prefix must be at most 32 characters, got {0}")]
    PrefixTooLong(usize),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let prefix = &config.prefix;

    // The tokenizer splits on whitespace and strips quotes, so such a
    // prefix could never be matched against the first token.
    if prefix.chars().any(char::is_whitespace) {
        errors.push(ValidationError::PrefixWhitespace(prefix.clone()));
    }
    if prefix.contains('"') {
        errors.push(ValidationError::PrefixQuote(prefix.clone()));
    }

    let chars = prefix.chars().count();
    if chars > MAX_PREFIX_CHARS {
        errors.push(ValidationError::PrefixTooLong(chars));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes() {
        assert!(validate(&Config::default()).is_ok());
        assert!(validate(&Config::with_prefix("slcmd.")).is_ok());
    }

    #[test]
    fn test_whitespace_prefix_fails() {
        let errors = validate(&Config::with_prefix("! ")).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::PrefixWhitespace(_))));
    }

    #[test]
    fn test_quote_prefix_fails() {
        let errors = validate(&Config::with_prefix("\"")).unwrap_err();
        assert_eq!(errors, vec![ValidationError::PrefixQuote("\"".to_string())]);
    }

    #[test]
    fn test_long_prefix_fails() {
        let errors = validate(&Config::with_prefix("é".repeat(33))).unwrap_err();
        assert_eq!(errors, vec![ValidationError::PrefixTooLong(33)]);
        assert!(validate(&Config::with_prefix("é".repeat(32))).is_ok());
    }

    #[test]
    fn test_empty_prefix_is_allowed() {
        assert!(validate(&Config::with_prefix("")).is_ok());
    }
}
