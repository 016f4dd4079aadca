//! Dispatcher setup.
//!
//! Commands and middleware can only be added through [`DispatcherBuilder`].
//! Once [`build`](DispatcherBuilder::build) returns, the registry and the
//! pipeline are frozen and the dispatcher can be attached to a platform.

use super::prefix::{GuildPrefixFn, PrefixResolver, no_guild_prefix};
use super::{Dispatcher, ErrorReporter, log_error};
use crate::config::Config;
use crate::error::{BoxError, DispatchError, ErrorKind};
use crate::handlers::{
    Command, CommandRegistry, Context, HelpCommand, Middleware, MiddlewarePipeline, RegistryError,
};
use crate::state::ObjectStore;
use std::any::Any;
use std::sync::Arc;
use tracing::debug;

/// Collects commands, middleware and callbacks for a [`Dispatcher`].
pub struct DispatcherBuilder {
    config: Config,
    registry: CommandRegistry,
    middlewares: MiddlewarePipeline,
    objects: ObjectStore,
    on_error: ErrorReporter,
    guild_prefix: GuildPrefixFn,
}

impl DispatcherBuilder {
    /// Start a builder. Registers [`HelpCommand`] when `config.help_command`
    /// is set.
    pub fn new(config: Config) -> Self {
        let mut registry = CommandRegistry::new(config.case_insensitive);
        if config.help_command {
            // The registry is empty, so this cannot conflict.
            if let Err(e) = registry.register(Arc::new(HelpCommand)) {
                tracing::warn!(error = %e, "Failed to register help command");
            }
        }

        Self {
            config,
            registry,
            middlewares: MiddlewarePipeline::new(),
            objects: ObjectStore::new(),
            on_error: Arc::new(log_error),
            guild_prefix: Arc::new(no_guild_prefix),
        }
    }

    /// Replace the error reporter. It is called once per aborted dispatch.
    pub fn on_error<F>(mut self, reporter: F) -> Self
    where
        F: Fn(&Context<'_>, ErrorKind, &DispatchError) + Send + Sync + 'static,
    {
        self.on_error = Arc::new(reporter);
        self
    }

    /// Set the per-guild prefix provider.
    pub fn guild_prefix<F>(mut self, provider: F) -> Self
    where
        F: Fn(Option<&str>) -> Result<Option<String>, BoxError> + Send + Sync + 'static,
    {
        self.guild_prefix = Arc::new(provider);
        self
    }

    /// Register a command under all of its invocations.
    pub fn command<C: Command + 'static>(self, command: C) -> Result<Self, RegistryError> {
        self.command_arc(Arc::new(command))
    }

    /// Register a shared command instance.
    pub fn command_arc(mut self, command: Arc<dyn Command>) -> Result<Self, RegistryError> {
        self.registry.register(command)?;
        Ok(self)
    }

    /// Append a middleware to the pipeline.
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        debug!(middleware = middleware.name(), layer = %middleware.layer(), "Registered middleware");
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Seed the object store.
    pub fn object<T: Any + Send + Sync>(self, key: impl Into<String>, value: T) -> Self {
        self.objects.set(key, value);
        self
    }

    /// Freeze the setup.
    pub fn build(self) -> Arc<Dispatcher> {
        debug!(
            invocations = self.registry.len(),
            commands = self.registry.instances().len(),
            middlewares = self.middlewares.len(),
            "Dispatcher ready"
        );
        Arc::new(Dispatcher {
            prefixes: PrefixResolver::new(self.config.prefix.clone(), self.guild_prefix),
            config: self.config,
            registry: self.registry,
            middlewares: self.middlewares,
            objects: self.objects,
            on_error: self.on_error,
        })
    }
}

impl std::fmt::Debug for DispatcherBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatcherBuilder")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("middlewares", &self.middlewares)
            .finish_non_exhaustive()
    }
}
