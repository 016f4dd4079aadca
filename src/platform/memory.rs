//! In-process platform.
//!
//! Holds channels, guilds and posted messages in memory, delivers events
//! synchronously to subscribed handlers, and records every network-tier call
//! so callers can observe cache behaviour. Individual operations can be made
//! to fail with [`MemoryPlatform::fail`].

use super::{
    Channel, ChannelKind, EventHandler, EventKind, Guild, Message, MessageEvent, Platform,
    PlatformError, Subscription, User,
};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::trace;
use uuid::Uuid;

/// Operations that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Failure {
    FetchChannel,
    FetchGuild,
    SendMessage,
    DeleteMessage,
}

struct Subscriber {
    id: u64,
    kind: EventKind,
    handler: EventHandler,
}

#[derive(Default)]
struct Store {
    channels: HashMap<String, Channel>,
    cached_channels: HashSet<String>,
    guilds: HashMap<String, Guild>,
    cached_guilds: HashSet<String>,
    messages: Vec<Message>,
    deleted: Vec<(String, String)>,
}

/// In-memory [`Platform`] implementation.
pub struct MemoryPlatform {
    self_id: String,
    store: RwLock<Store>,
    failures: RwLock<HashSet<Failure>>,
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
    next_subscriber: AtomicU64,
    channel_fetches: AtomicUsize,
    guild_fetches: AtomicUsize,
}

impl MemoryPlatform {
    /// Create an empty platform whose session account is `self_id`.
    pub fn new(self_id: impl Into<String>) -> Self {
        Self {
            self_id: self_id.into(),
            store: RwLock::new(Store::default()),
            failures: RwLock::new(HashSet::new()),
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_subscriber: AtomicU64::new(1),
            channel_fetches: AtomicUsize::new(0),
            guild_fetches: AtomicUsize::new(0),
        }
    }

    /// Add a guild, optionally visible in the cache tier.
    pub fn add_guild(&self, guild: Guild, cached: bool) {
        let mut store = self.store.write();
        if cached {
            store.cached_guilds.insert(guild.id.clone());
        }
        store.guilds.insert(guild.id.clone(), guild);
    }

    /// Add a channel, optionally visible in the cache tier.
    pub fn add_channel(&self, channel: Channel, cached: bool) {
        let mut store = self.store.write();
        if cached {
            store.cached_channels.insert(channel.id.clone());
        }
        store.channels.insert(channel.id.clone(), channel);
    }

    /// Make `op` fail (or succeed again) from now on.
    pub fn fail(&self, op: Failure, failing: bool) {
        let mut failures = self.failures.write();
        if failing {
            failures.insert(op);
        } else {
            failures.remove(&op);
        }
    }

    fn failing(&self, op: Failure) -> bool {
        self.failures.read().contains(&op)
    }

    /// Build a message from `author` in `channel_id` without emitting it.
    ///
    /// The guild id is taken from the channel when it is known.
    pub fn compose(&self, channel_id: &str, author: &User, content: &str) -> Message {
        let guild_id = self
            .store
            .read()
            .channels
            .get(channel_id)
            .and_then(|c| c.guild_id.clone());
        Message {
            id: Uuid::new_v4().to_string(),
            channel_id: channel_id.to_string(),
            guild_id,
            content: content.to_string(),
            author: Some(author.clone()),
            member: None,
        }
    }

    /// Store a message from `author` and emit a create event.
    pub fn post(&self, channel_id: &str, author: &User, content: &str) -> Message {
        let message = self.compose(channel_id, author, content);
        self.store.write().messages.push(message.clone());
        self.emit(EventKind::MessageCreate, message.clone());
        message
    }

    /// Replace the content of a stored message and emit an update event.
    pub fn edit(&self, message_id: &str, content: &str) -> Result<Message, PlatformError> {
        let updated = {
            let mut store = self.store.write();
            let message = store
                .messages
                .iter_mut()
                .find(|m| m.id == message_id)
                .ok_or_else(|| PlatformError::NotFound {
                    resource: "message",
                    id: message_id.to_string(),
                })?;
            message.content = content.to_string();
            message.clone()
        };
        self.emit(EventKind::MessageUpdate, updated.clone());
        Ok(updated)
    }

    /// Deliver an event to every handler subscribed to `kind`.
    pub fn emit(&self, kind: EventKind, message: Message) {
        // Clone the handler list so handlers may subscribe or unsubscribe.
        let handlers: Vec<EventHandler> = self
            .subscribers
            .lock()
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| Arc::clone(&s.handler))
            .collect();
        trace!(?kind, handlers = handlers.len(), "emitting event");
        for handler in handlers {
            handler(MessageEvent {
                kind,
                message: message.clone(),
            });
        }
    }

    /// Messages posted so far, including those sent through the platform.
    pub fn messages(&self) -> Vec<Message> {
        self.store.read().messages.clone()
    }

    /// Messages authored by this session (replies).
    pub fn sent_messages(&self) -> Vec<Message> {
        self.store
            .read()
            .messages
            .iter()
            .filter(|m| m.author.as_ref().is_some_and(|a| a.id == self.self_id))
            .cloned()
            .collect()
    }

    /// `(channel_id, message_id)` pairs deleted so far.
    pub fn deleted(&self) -> Vec<(String, String)> {
        self.store.read().deleted.clone()
    }

    /// Number of network-tier channel fetches.
    pub fn channel_fetches(&self) -> usize {
        self.channel_fetches.load(Ordering::Relaxed)
    }

    /// Number of network-tier guild fetches.
    pub fn guild_fetches(&self) -> usize {
        self.guild_fetches.load(Ordering::Relaxed)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    fn session_user(&self) -> User {
        User {
            id: self.self_id.clone(),
            username: self.self_id.clone(),
            bot: true,
        }
    }
}

#[async_trait]
impl Platform for MemoryPlatform {
    fn self_id(&self) -> &str {
        &self.self_id
    }

    fn cached_channel(&self, channel_id: &str) -> Option<Channel> {
        let store = self.store.read();
        if !store.cached_channels.contains(channel_id) {
            return None;
        }
        store.channels.get(channel_id).cloned()
    }

    async fn fetch_channel(&self, channel_id: &str) -> Result<Channel, PlatformError> {
        self.channel_fetches.fetch_add(1, Ordering::Relaxed);
        if self.failing(Failure::FetchChannel) {
            return Err(PlatformError::Request("channel fetch failed".to_string()));
        }
        let mut store = self.store.write();
        let channel = store
            .channels
            .get(channel_id)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound {
                resource: "channel",
                id: channel_id.to_string(),
            })?;
        store.cached_channels.insert(channel.id.clone());
        Ok(channel)
    }

    fn cached_guild(&self, guild_id: &str) -> Option<Guild> {
        let store = self.store.read();
        if !store.cached_guilds.contains(guild_id) {
            return None;
        }
        store.guilds.get(guild_id).cloned()
    }

    async fn fetch_guild(&self, guild_id: &str) -> Result<Guild, PlatformError> {
        self.guild_fetches.fetch_add(1, Ordering::Relaxed);
        if self.failing(Failure::FetchGuild) {
            return Err(PlatformError::Request("guild fetch failed".to_string()));
        }
        let mut store = self.store.write();
        let guild = store
            .guilds
            .get(guild_id)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound {
                resource: "guild",
                id: guild_id.to_string(),
            })?;
        store.cached_guilds.insert(guild.id.clone());
        Ok(guild)
    }

    async fn send_message(
        &self,
        channel_id: &str,
        content: &str,
    ) -> Result<Message, PlatformError> {
        if self.failing(Failure::SendMessage) {
            return Err(PlatformError::Request("send failed".to_string()));
        }
        let message = self.compose(channel_id, &self.session_user(), content);
        self.store.write().messages.push(message.clone());
        self.emit(EventKind::MessageCreate, message.clone());
        Ok(message)
    }

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<(), PlatformError> {
        if self.failing(Failure::DeleteMessage) {
            return Err(PlatformError::Request("delete failed".to_string()));
        }
        let mut store = self.store.write();
        let before = store.messages.len();
        store
            .messages
            .retain(|m| !(m.id == message_id && m.channel_id == channel_id));
        if store.messages.len() == before {
            return Err(PlatformError::NotFound {
                resource: "message",
                id: message_id.to_string(),
            });
        }
        store
            .deleted
            .push((channel_id.to_string(), message_id.to_string()));
        Ok(())
    }

    fn subscribe(&self, kind: EventKind, handler: EventHandler) -> Subscription {
        let id = self.next_subscriber.fetch_add(1, Ordering::Relaxed);
        self.subscribers.lock().push(Subscriber { id, kind, handler });

        let subscribers = Arc::clone(&self.subscribers);
        Subscription::new(move || subscribers.lock().retain(|s| s.id != id))
    }
}

/// Convenience constructors for fixtures.
impl MemoryPlatform {
    /// A platform with guild `g1` ("Straylight") holding text channel `c1`
    /// (`#general`) and a direct-message channel `dm1`, all cached.
    pub fn with_defaults(self_id: impl Into<String>) -> Self {
        let platform = Self::new(self_id);
        platform.add_guild(
            Guild {
                id: "g1".to_string(),
                name: "Straylight".to_string(),
                owner_id: "u0".to_string(),
            },
            true,
        );
        platform.add_channel(
            Channel {
                id: "c1".to_string(),
                kind: ChannelKind::GuildText,
                guild_id: Some("g1".to_string()),
                name: "general".to_string(),
            },
            true,
        );
        platform.add_channel(
            Channel {
                id: "dm1".to_string(),
                kind: ChannelKind::Dm,
                guild_id: None,
                name: String::new(),
            },
            true,
        );
        platform
    }
}
