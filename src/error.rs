//! Unified error handling for slcmd.
//!
//! Every failure that aborts a dispatch is a [`DispatchError`], classified by
//! one of eight [`ErrorKind`]s and delivered once through the configured error
//! reporter. Setup faults ([`RegistryError`](crate::handlers::RegistryError),
//! [`ConfigError`](crate::config::ConfigError)) are separate types because
//! they surface before any message is processed.

use crate::platform::PlatformError;
use std::fmt;
use thiserror::Error;

/// Boxed error used for failures that come from user code (commands,
/// middleware, prefix providers).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// Error classification
// ============================================================================

/// Classification tag passed to the error reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The per-guild prefix provider failed.
    GuildPrefixLookup,
    /// The channel could not be resolved from cache or network.
    GetChannel,
    /// The guild could not be resolved from cache or network.
    GetGuild,
    /// No command is registered under the invocation.
    CommandNotFound,
    /// The command is not allowed in direct-message channels.
    NotExecutableInDm,
    /// A middleware returned an error.
    Middleware,
    /// The command returned an error.
    CommandExec,
    /// Deleting the triggering message after execution failed.
    DeleteCommandMessage,
}

impl ErrorKind {
    /// All kinds, in dispatch order.
    pub const ALL: [Self; 8] = [
        Self::GuildPrefixLookup,
        Self::GetChannel,
        Self::GetGuild,
        Self::CommandNotFound,
        Self::NotExecutableInDm,
        Self::Middleware,
        Self::CommandExec,
        Self::DeleteCommandMessage,
    ];

    /// Static label for logs and metrics.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GuildPrefixLookup => "guild_prefix_lookup",
            Self::GetChannel => "get_channel",
            Self::GetGuild => "get_guild",
            Self::CommandNotFound => "command_not_found",
            Self::NotExecutableInDm => "not_executable_in_dm",
            Self::Middleware => "middleware",
            Self::CommandExec => "command_exec",
            Self::DeleteCommandMessage => "delete_command_message",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Dispatch errors
// ============================================================================

/// A failure that aborted the dispatch of one message.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("guild prefix lookup failed: {0}")]
    GuildPrefixLookup(#[source] BoxError),

    #[error("failed to get channel {channel_id}: {source}")]
    GetChannel {
        channel_id: String,
        #[source]
        source: PlatformError,
    },

    #[error("failed to get guild for channel {channel_id}: {source}")]
    GetGuild {
        channel_id: String,
        #[source]
        source: PlatformError,
    },

    #[error("command not found: {0:?}")]
    CommandNotFound(String),

    #[error("command {0:?} is not executable in direct messages")]
    NotExecutableInDm(String),

    #[error("middleware {middleware} failed: {source}")]
    Middleware {
        middleware: String,
        #[source]
        source: BoxError,
    },

    #[error("command {invocation:?} failed: {source}")]
    CommandExec {
        invocation: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to delete command message {message_id}: {source}")]
    DeleteCommandMessage {
        message_id: String,
        #[source]
        source: PlatformError,
    },
}

impl DispatchError {
    /// The classification of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::GuildPrefixLookup(_) => ErrorKind::GuildPrefixLookup,
            Self::GetChannel { .. } => ErrorKind::GetChannel,
            Self::GetGuild { .. } => ErrorKind::GetGuild,
            Self::CommandNotFound(_) => ErrorKind::CommandNotFound,
            Self::NotExecutableInDm(_) => ErrorKind::NotExecutableInDm,
            Self::Middleware { .. } => ErrorKind::Middleware,
            Self::CommandExec { .. } => ErrorKind::CommandExec,
            Self::DeleteCommandMessage { .. } => ErrorKind::DeleteCommandMessage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels_are_unique() {
        let mut labels: Vec<&str> = ErrorKind::ALL.iter().map(|k| k.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), ErrorKind::ALL.len());
    }

    #[test]
    fn test_kind_mapping() {
        let err = DispatchError::CommandNotFound("nope".to_string());
        assert_eq!(err.kind(), ErrorKind::CommandNotFound);

        let err = DispatchError::GetChannel {
            channel_id: "c1".to_string(),
            source: PlatformError::NotFound {
                resource: "channel",
                id: "c1".to_string(),
            },
        };
        assert_eq!(err.kind(), ErrorKind::GetChannel);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_user_errors_chain_through() {
        let source: BoxError = anyhow::anyhow!("database offline").into();
        let err = DispatchError::CommandExec {
            invocation: "ping".to_string(),
            source,
        };
        assert_eq!(err.kind(), ErrorKind::CommandExec);
        assert!(err.to_string().contains("database offline"));
    }
}
