//! Per-dispatch context.
//!
//! A [`Context`] is created fresh for each dispatched message, filled in step
//! by step as dispatch progresses, and dropped when dispatch ends. It is
//! handed to middleware, to the command, and to the error reporter.
//!
//! ## Field availability
//!
//! The error reporter may see a partially filled context. By error kind:
//!
//! | Kind                   | `channel` | `guild`     | `invocation`/`args` | dispatcher in `extensions` |
//! |------------------------|-----------|-------------|---------------------|----------------------------|
//! | `GuildPrefixLookup`    | no        | no          | no                  | no                         |
//! | `GetChannel`           | no        | no          | no                  | no                         |
//! | `GetGuild`             | yes       | no          | no                  | no                         |
//! | `CommandNotFound`      | yes       | unless DM   | yes                 | no                         |
//! | `NotExecutableInDm`    | yes       | no (DM)     | yes                 | no                         |
//! | `Middleware`           | yes       | unless DM   | yes                 | yes                        |
//! | `CommandExec`          | yes       | unless DM   | yes                 | yes                        |
//! | `DeleteCommandMessage` | yes       | unless DM   | yes                 | yes                        |
//!
//! `message`, `platform` and `is_edit` are always present.

use crate::dispatch::Dispatcher;
use crate::platform::{Channel, Guild, Member, Message, Platform, PlatformError, User};
use crate::state::{DISPATCHER_KEY, Extensions};
use slcmd_proto::ArgumentList;
use std::sync::Arc;

static NO_ARGS: ArgumentList = ArgumentList::new();

/// Handler context passed to middleware, commands and the error reporter.
pub struct Context<'a> {
    /// Platform session the message arrived on.
    pub platform: &'a dyn Platform,
    /// The triggering message.
    pub message: &'a Message,
    /// Whether dispatch was triggered by an edit.
    pub is_edit: bool,
    /// Resolved channel.
    pub channel: Option<Channel>,
    /// Resolved guild; never set for direct-message channels.
    pub guild: Option<Guild>,
    /// Whether the channel is a direct or group-direct channel.
    pub is_dm: bool,
    /// Prefix the message matched.
    pub prefix: Option<String>,
    /// Invocation name as typed (before case folding).
    pub invocation: Option<String>,
    /// Parsed arguments.
    pub args: Option<ArgumentList>,
    /// Values private to this dispatch.
    pub extensions: Extensions,
}

impl<'a> Context<'a> {
    /// Create a context holding only the message.
    pub fn new(platform: &'a dyn Platform, message: &'a Message, is_edit: bool) -> Self {
        Self {
            platform,
            message,
            is_edit,
            channel: None,
            guild: None,
            is_dm: false,
            prefix: None,
            invocation: None,
            args: None,
            extensions: Extensions::new(),
        }
    }

    /// Parsed arguments, or an empty list before tokenizing ran.
    pub fn args(&self) -> &ArgumentList {
        self.args.as_ref().unwrap_or(&NO_ARGS)
    }

    /// Author of the message.
    pub fn author(&self) -> Option<&User> {
        self.message.author.as_ref()
    }

    /// Author id of the message.
    pub fn author_id(&self) -> Option<&str> {
        self.author().map(|u| u.id.as_str())
    }

    /// Guild member info of the author.
    pub fn member(&self) -> Option<&Member> {
        self.message.member.as_ref()
    }

    /// The dispatcher running this dispatch.
    ///
    /// Present from the moment middleware start running.
    pub fn dispatcher(&self) -> Option<&Arc<Dispatcher>> {
        self.extensions.try_get::<Arc<Dispatcher>>(DISPATCHER_KEY)
    }

    /// Send a plain-text reply to the channel the message came from.
    pub async fn reply(&self, content: &str) -> Result<Message, PlatformError> {
        self.platform
            .send_message(&self.message.channel_id, content)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryPlatform;

    fn message() -> Message {
        Message {
            id: "m1".to_string(),
            channel_id: "c1".to_string(),
            guild_id: Some("g1".to_string()),
            content: "!ping".to_string(),
            author: Some(User {
                id: "u1".to_string(),
                username: "alice".to_string(),
                bot: false,
            }),
            member: None,
        }
    }

    #[test]
    fn test_fresh_context_is_empty() {
        let platform = MemoryPlatform::new("bot");
        let msg = message();
        let ctx = Context::new(&platform, &msg, false);

        assert!(ctx.channel.is_none());
        assert!(ctx.guild.is_none());
        assert!(ctx.args().is_empty());
        assert!(ctx.dispatcher().is_none());
        assert!(ctx.extensions.is_empty());
        assert_eq!(ctx.author_id(), Some("u1"));
    }

    #[tokio::test]
    async fn test_reply_goes_to_origin_channel() {
        let platform = MemoryPlatform::with_defaults("bot");
        let msg = message();
        let ctx = Context::new(&platform, &msg, false);

        let sent = ctx.reply("pong").await.unwrap();
        assert_eq!(sent.channel_id, "c1");
        assert_eq!(platform.sent_messages().len(), 1);
    }
}
