//! Error types for argument coercion.
//!
//! Coercion failures are ordinary results handed back to command code; the
//! dispatcher never sees them.

use thiserror::Error;

/// Convenience type alias for Results using [`ArgumentError`].
pub type Result<T, E = ArgumentError> = std::result::Result<T, E>;

/// Failure to coerce a single argument token into a typed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ArgumentError {
    /// The token is not a base-10 integer.
    #[error("invalid integer {value:?}: {source}")]
    InvalidInt {
        /// The offending token.
        value: String,
        /// Underlying parse failure.
        source: std::num::ParseIntError,
    },

    /// The token is not a decimal floating-point number.
    #[error("invalid float {value:?}: {source}")]
    InvalidFloat {
        /// The offending token.
        value: String,
        /// Underlying parse failure.
        source: std::num::ParseFloatError,
    },

    /// The token is not one of the accepted boolean spellings.
    #[error("invalid boolean {value:?}: expected one of 1, t, T, TRUE, true, True, 0, f, F, FALSE, false, False")]
    InvalidBool {
        /// The offending token.
        value: String,
    },

    /// The token could not be converted by a caller-supplied `FromStr` impl.
    #[error("invalid {expected} {value:?}: {reason}")]
    Invalid {
        /// The offending token.
        value: String,
        /// Name of the target type.
        expected: &'static str,
        /// Display text of the underlying error.
        reason: String,
    },
}

impl ArgumentError {
    /// The raw token that failed to coerce.
    pub fn value(&self) -> &str {
        match self {
            Self::InvalidInt { value, .. }
            | Self::InvalidFloat { value, .. }
            | Self::InvalidBool { value }
            | Self::Invalid { value, .. } => value,
        }
    }
}
