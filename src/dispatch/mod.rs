//! Message dispatch.
//!
//! A [`Dispatcher`] turns one inbound message into at most one command
//! execution. Each dispatch walks a fixed sequence of gated steps:
//!
//! 1. ignore own, bot (unless allowed) and too-short messages
//! 2. resolve the used prefix
//! 3. resolve the channel (cache, then network)
//! 4. stop in direct messages unless they are allowed
//! 5. resolve the guild for guild channels (cache, then network)
//! 6. tokenize and extract the invocation
//! 7. look up the command
//! 8. refuse commands not executable in direct messages
//! 9. seed the context with the dispatcher
//! 10. run the before-command middleware
//! 11. execute the command
//! 12. run the after-command middleware
//! 13. delete the triggering message if configured
//!
//! A step either continues, stops silently, or reports exactly one
//! [`DispatchError`] through the error reporter and stops.

mod builder;
mod prefix;

pub use builder::DispatcherBuilder;
pub use prefix::{GuildPrefixFn, PrefixResolver, no_guild_prefix};

use crate::config::Config;
use crate::error::{DispatchError, ErrorKind};
use crate::handlers::{Command, CommandRegistry, Context, Flow, Layer, MiddlewarePipeline};
use crate::metrics;
use crate::platform::{
    Channel, EventKind, Guild, Message, MessageEvent, Platform, PlatformError, Subscription,
};
use crate::state::{DISPATCHER_KEY, ObjectError, ObjectStore};
use crate::telemetry::{CommandTimer, spans};
use slcmd_proto::{Invocation, InvocationStyle, tokenize};
use std::any::Any;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::{Instrument, debug, trace, warn};

/// Messages shorter than this (in bytes) cannot hold a prefix and a name.
pub const MIN_CONTENT_LEN: usize = 2;

/// Error reporter callback.
pub type ErrorReporter = Arc<dyn Fn(&Context<'_>, ErrorKind, &DispatchError) + Send + Sync>;

/// Reporter used when none is configured.
pub fn log_error(ctx: &Context<'_>, kind: ErrorKind, err: &DispatchError) {
    warn!(
        kind = %kind,
        message_id = %ctx.message.id,
        channel_id = %ctx.message.channel_id,
        author_id = ctx.author_id(),
        invocation = ctx.invocation.as_deref(),
        error = %err,
        "Command dispatch failed"
    );
}

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
    /// Own, bot, authorless, too short, or an edit while edits are off.
    Ignored,
    /// No prefix matched.
    NoPrefix,
    /// Direct message while direct messages are disabled.
    DirectMessagesDisabled,
    /// A middleware halted the dispatch.
    Halted,
    /// An error was reported.
    Failed(ErrorKind),
    /// The command ran and every step after it succeeded.
    Completed,
}

impl DispatchOutcome {
    /// Static label for logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignored => "ignored",
            Self::NoPrefix => "no_prefix",
            Self::DirectMessagesDisabled => "dm_disabled",
            Self::Halted => "halted",
            Self::Failed(_) => "failed",
            Self::Completed => "completed",
        }
    }

    #[inline]
    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }
}

/// Errors from [`Dispatcher::attach`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachError {
    #[error("attach must be called from within a Tokio runtime")]
    NoRuntime,
}

/// The command dispatcher.
///
/// Built by [`DispatcherBuilder`]; the registry and middleware pipeline are
/// read-only afterwards. The object store stays writable.
pub struct Dispatcher {
    config: Config,
    registry: CommandRegistry,
    middlewares: MiddlewarePipeline,
    objects: ObjectStore,
    prefixes: PrefixResolver,
    on_error: ErrorReporter,
}

impl Dispatcher {
    /// Start configuring a dispatcher.
    pub fn builder(config: Config) -> DispatcherBuilder {
        DispatcherBuilder::new(config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Invocation → command map.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &Arc<dyn Command>)> {
        self.registry.commands()
    }

    /// Each registered command once, in registration order.
    pub fn instances(&self) -> &[Arc<dyn Command>] {
        self.registry.instances()
    }

    /// Look up a command by invocation.
    pub fn command(&self, invocation: &str) -> Option<&Arc<dyn Command>> {
        self.registry.lookup(invocation)
    }

    /// Usage counts by primary invocation, most used first.
    pub fn command_stats(&self) -> Vec<(String, u64)> {
        self.registry.command_stats()
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn middlewares(&self) -> &MiddlewarePipeline {
        &self.middlewares
    }

    /// The process-wide object store.
    pub fn objects(&self) -> &ObjectStore {
        &self.objects
    }

    pub fn get_object<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>, ObjectError> {
        self.objects.get(key)
    }

    pub fn set_object<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        self.objects.set(key, value);
    }

    /// Subscribe to message events of `platform`.
    ///
    /// Message creation is always handled; edits only with
    /// `execute_on_edit`. Every event is dispatched on its own task of the
    /// runtime `attach` was called from. The subscriptions hold the platform
    /// weakly.
    pub fn attach<P: Platform + 'static>(
        self: &Arc<Self>,
        platform: &Arc<P>,
    ) -> Result<Vec<Subscription>, AttachError> {
        let handle = Handle::try_current().map_err(|_| AttachError::NoRuntime)?;

        let mut kinds = vec![EventKind::MessageCreate];
        if self.config.execute_on_edit {
            kinds.push(EventKind::MessageUpdate);
        }

        let subscriptions = kinds
            .into_iter()
            .map(|kind| {
                let dispatcher = Arc::clone(self);
                let session = Arc::downgrade(platform);
                let handle = handle.clone();
                platform.subscribe(
                    kind,
                    Arc::new(move |event: MessageEvent| {
                        let Some(platform) = session.upgrade() else {
                            return;
                        };
                        let dispatcher = Arc::clone(&dispatcher);
                        handle.spawn(async move {
                            let is_edit = event.is_edit();
                            dispatcher
                                .dispatch(platform.as_ref(), &event.message, is_edit)
                                .await;
                        });
                    }),
                )
            })
            .collect();

        debug!(edits = self.config.execute_on_edit, "Dispatcher attached");
        Ok(subscriptions)
    }

    /// Dispatch one message.
    pub async fn dispatch(
        self: &Arc<Self>,
        platform: &dyn Platform,
        message: &Message,
        is_edit: bool,
    ) -> DispatchOutcome {
        let mut ctx = Context::new(platform, message, is_edit);
        let outcome = self
            .run(&mut ctx)
            .instrument(spans::dispatch(message, is_edit))
            .await;
        metrics::record_dispatch(outcome.as_str());
        outcome
    }

    fn fail(&self, ctx: &Context<'_>, err: DispatchError) -> DispatchOutcome {
        let kind = err.kind();
        metrics::record_command_error(kind.as_str());
        (self.on_error)(ctx, kind, &err);
        DispatchOutcome::Failed(kind)
    }

    async fn run(self: &Arc<Self>, ctx: &mut Context<'_>) -> DispatchOutcome {
        let platform = ctx.platform;
        let message = ctx.message;

        // 1. early filters
        if ctx.is_edit && !self.config.execute_on_edit {
            trace!("Edits are not dispatched");
            return DispatchOutcome::Ignored;
        }
        let Some(author) = message.author.as_ref() else {
            trace!("Message has no author");
            return DispatchOutcome::Ignored;
        };
        if author.id == platform.self_id() || (author.bot && !self.config.allow_bots) {
            trace!(bot = author.bot, "Ignoring message author");
            return DispatchOutcome::Ignored;
        }
        if message.content.len() < MIN_CONTENT_LEN {
            trace!("Message too short");
            return DispatchOutcome::Ignored;
        }

        // 2. prefix
        let prefix = match self
            .prefixes
            .resolve(&message.content, message.guild_id.as_deref())
        {
            Ok(Some(prefix)) => prefix,
            Ok(None) => {
                trace!("No prefix matched");
                return DispatchOutcome::NoPrefix;
            }
            Err(e) => return self.fail(ctx, DispatchError::GuildPrefixLookup(e)),
        };

        // 3. channel
        let channel = match resolve_channel(platform, &message.channel_id).await {
            Ok(channel) => channel,
            Err(source) => {
                return self.fail(
                    ctx,
                    DispatchError::GetChannel {
                        channel_id: message.channel_id.clone(),
                        source,
                    },
                );
            }
        };
        let is_dm = channel.kind.is_direct();
        let guild_id = message.guild_id.clone().or_else(|| channel.guild_id.clone());
        ctx.is_dm = is_dm;
        ctx.channel = Some(channel);

        // 4. direct messages
        if is_dm && !self.config.allow_dm {
            trace!("Direct messages are disabled");
            return DispatchOutcome::DirectMessagesDisabled;
        }

        // 5. guild
        if !is_dm {
            match resolve_guild(platform, &message.channel_id, guild_id.as_deref()).await {
                Ok(guild) => ctx.guild = Some(guild),
                Err(source) => {
                    return self.fail(
                        ctx,
                        DispatchError::GetGuild {
                            channel_id: message.channel_id.clone(),
                            source,
                        },
                    );
                }
            }
        }

        // 6. tokenize
        let style = InvocationStyle::from_space_after_prefix(self.config.space_after_prefix);
        let Invocation { name, args } = Invocation::extract(tokenize(&message.content), &prefix, style);
        ctx.prefix = Some(prefix);
        ctx.invocation = Some(name.clone());
        ctx.args = Some(args);

        // 7. lookup
        let Some(command) = self.registry.lookup_counted(&name).cloned() else {
            return self.fail(ctx, DispatchError::CommandNotFound(name));
        };

        // 8. DM capability
        if is_dm && !command.executable_in_dm() {
            return self.fail(ctx, DispatchError::NotExecutableInDm(name));
        }

        // 9. context
        ctx.extensions.set(DISPATCHER_KEY, Arc::clone(self));

        // 10. before-command middleware
        match self
            .middlewares
            .run_layer(Layer::BEFORE_COMMAND, command.as_ref(), ctx)
            .await
        {
            Ok(Flow::Continue) => {}
            Ok(Flow::Halt) => return DispatchOutcome::Halted,
            Err(e) => return self.fail(ctx, e),
        }

        // 11. execute
        let label = command.invocations().first().copied().unwrap_or_default().to_string();
        let result = {
            let _timer = CommandTimer::new(label);
            command.execute(ctx).instrument(spans::exec(&name)).await
        };
        if let Err(e) = result {
            return self.fail(
                ctx,
                DispatchError::CommandExec {
                    invocation: name,
                    source: e.into(),
                },
            );
        }

        // 12. after-command middleware
        match self
            .middlewares
            .run_layer(Layer::AFTER_COMMAND, command.as_ref(), ctx)
            .await
        {
            Ok(Flow::Continue) => {}
            Ok(Flow::Halt) => return DispatchOutcome::Halted,
            Err(e) => return self.fail(ctx, e),
        }

        // 13. cleanup
        if self.config.delete_message_after
            && let Err(source) = platform
                .delete_message(&message.channel_id, &message.id)
                .await
        {
            return self.fail(
                ctx,
                DispatchError::DeleteCommandMessage {
                    message_id: message.id.clone(),
                    source,
                },
            );
        }

        trace!(invocation = %name, "Command completed");
        DispatchOutcome::Completed
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("middlewares", &self.middlewares)
            .field("prefixes", &self.prefixes)
            .finish_non_exhaustive()
    }
}

async fn resolve_channel(platform: &dyn Platform, channel_id: &str) -> Result<Channel, PlatformError> {
    match platform.cached_channel(channel_id) {
        Some(channel) => Ok(channel),
        None => platform.fetch_channel(channel_id).await,
    }
}

async fn resolve_guild(
    platform: &dyn Platform,
    channel_id: &str,
    guild_id: Option<&str>,
) -> Result<Guild, PlatformError> {
    let Some(guild_id) = guild_id else {
        return Err(PlatformError::NoGuild {
            channel_id: channel_id.to_string(),
        });
    };
    match platform.cached_guild(guild_id) {
        Some(guild) => Ok(guild),
        None => platform.fetch_guild(guild_id).await,
    }
}
