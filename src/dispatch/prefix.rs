//! Prefix resolution.
//!
//! The global prefix always wins. Only when the message does not start with
//! it is the per-guild prefix provider consulted.

use crate::error::BoxError;
use std::sync::Arc;

/// Per-guild prefix provider.
///
/// Called with the message's guild id (`None` in direct messages). `Ok(None)`
/// and `Ok(Some(""))` both mean the guild has no prefix of its own.
pub type GuildPrefixFn =
    Arc<dyn Fn(Option<&str>) -> Result<Option<String>, BoxError> + Send + Sync>;

/// Provider used when none is configured.
pub fn no_guild_prefix(_guild_id: Option<&str>) -> Result<Option<String>, BoxError> {
    Ok(None)
}

/// Chooses which prefix a message used.
#[derive(Clone)]
pub struct PrefixResolver {
    global: String,
    guild: GuildPrefixFn,
}

impl PrefixResolver {
    pub fn new(global: impl Into<String>, guild: GuildPrefixFn) -> Self {
        Self {
            global: global.into(),
            guild,
        }
    }

    /// The configured global prefix.
    pub fn global(&self) -> &str {
        &self.global
    }

    /// Resolve the prefix `content` starts with.
    ///
    /// Returns `Ok(None)` when the message is not a command attempt. An error
    /// from the guild provider is passed through unchanged.
    pub fn resolve(&self, content: &str, guild_id: Option<&str>) -> Result<Option<String>, BoxError> {
        if !self.global.is_empty() && content.starts_with(&self.global) {
            return Ok(Some(self.global.clone()));
        }

        match (self.guild)(guild_id)? {
            Some(prefix) if !prefix.is_empty() && content.starts_with(&prefix) => Ok(Some(prefix)),
            _ => Ok(None),
        }
    }
}

impl std::fmt::Debug for PrefixResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefixResolver")
            .field("global", &self.global)
            .finish_non_exhaustive()
    }
}
