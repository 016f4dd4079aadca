//! Chat platform contract.
//!
//! The dispatcher never talks to a concrete chat service. It consumes the
//! [`Platform`] trait: the session identity, channel/guild resolution with a
//! cache tier and a network tier, message deletion, message sending, and
//! event subscription. [`MemoryPlatform`] is the in-process implementation
//! used by the console binary and the test suite.

pub mod memory;

pub use memory::{Failure, MemoryPlatform};

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// Model
// ============================================================================

/// A platform account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Whether the account is an automated (bot) account.
    pub bot: bool,
}

/// Guild membership details of a message author.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Member {
    pub user_id: String,
    pub nick: Option<String>,
    pub roles: Vec<String>,
}

/// An inbound or stored chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    /// Absent for direct messages.
    pub guild_id: Option<String>,
    pub content: String,
    /// Absent for system messages.
    pub author: Option<User>,
    /// Present for guild messages on platforms that attach member info.
    pub member: Option<Member>,
}

/// Kind of channel a message was posted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    GuildText,
    GuildVoice,
    Thread,
    Dm,
    GroupDm,
}

impl ChannelKind {
    /// Direct and group-direct channels.
    #[inline]
    pub fn is_direct(self) -> bool {
        matches!(self, Self::Dm | Self::GroupDm)
    }
}

/// A resolved channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub kind: ChannelKind,
    pub guild_id: Option<String>,
    pub name: String,
}

/// A resolved guild (server/community).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: String,
    pub name: String,
    pub owner_id: String,
}

// ============================================================================
// Events
// ============================================================================

/// Message events a dispatcher can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MessageCreate,
    MessageUpdate,
}

/// A message event delivered to subscribed handlers.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub kind: EventKind,
    pub message: Message,
}

impl MessageEvent {
    /// Whether the event reports an edited message.
    #[inline]
    pub fn is_edit(&self) -> bool {
        self.kind == EventKind::MessageUpdate
    }
}

/// Callback invoked for each subscribed event.
pub type EventHandler = Arc<dyn Fn(MessageEvent) + Send + Sync>;

/// Handle returned by [`Platform::subscribe`].
///
/// Dropping the handle keeps the subscription alive; call
/// [`unsubscribe`](Self::unsubscribe) to detach.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap a detach callback.
    pub fn new(detach: impl FnOnce() + Send + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// A subscription with nothing to detach.
    pub fn noop() -> Self {
        Self { detach: None }
    }

    /// Detach the handler.
    pub fn unsubscribe(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

// ============================================================================
// Platform
// ============================================================================

/// Errors returned by platform calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("channel {channel_id} does not belong to a guild")]
    NoGuild { channel_id: String },

    #[error("request failed: {0}")]
    Request(String),

    #[error("platform session closed")]
    Closed,
}

/// Capabilities the dispatcher needs from a chat platform session.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Account id of this session; messages it authored are never dispatched.
    fn self_id(&self) -> &str;

    /// Channel from the local cache, if present.
    fn cached_channel(&self, channel_id: &str) -> Option<Channel>;

    /// Channel fetched over the network.
    async fn fetch_channel(&self, channel_id: &str) -> Result<Channel, PlatformError>;

    /// Guild from the local cache, if present.
    fn cached_guild(&self, guild_id: &str) -> Option<Guild>;

    /// Guild fetched over the network.
    async fn fetch_guild(&self, guild_id: &str) -> Result<Guild, PlatformError>;

    /// Post a plain-text message to a channel.
    async fn send_message(&self, channel_id: &str, content: &str)
    -> Result<Message, PlatformError>;

    /// Delete a message.
    async fn delete_message(&self, channel_id: &str, message_id: &str)
    -> Result<(), PlatformError>;

    /// Register `handler` for events of `kind`.
    fn subscribe(&self, kind: EventKind, handler: EventHandler) -> Subscription;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_direct_kinds() {
        assert!(ChannelKind::Dm.is_direct());
        assert!(ChannelKind::GroupDm.is_direct());
        assert!(!ChannelKind::GuildText.is_direct());
        assert!(!ChannelKind::Thread.is_direct());
    }

    #[test]
    fn test_unsubscribe_runs_detach_once() {
        let detached = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&detached);
        let sub = Subscription::new(move || flag.store(true, Ordering::SeqCst));
        assert!(!detached.load(Ordering::SeqCst));
        sub.unsubscribe();
        assert!(detached.load(Ordering::SeqCst));
    }

    #[test]
    fn test_noop_subscription() {
        Subscription::noop().unsubscribe();
    }
}
