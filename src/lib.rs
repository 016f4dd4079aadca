//! # slcmd
//!
//! Command dispatch for text chat platforms.
//!
//! A [`Dispatcher`] receives message events from a [`Platform`], decides
//! whether a message invokes a registered [`Command`], parses the invocation
//! into a name and [`ArgumentList`], runs the [`Middleware`] pipeline around
//! the command, and reports every failure through one classified error hook.
//!
//! ## Quick Start
//!
//! ```no_run
//! use async_trait::async_trait;
//! use slcmd::{Command, Config, Context, Dispatcher, MemoryPlatform};
//! use std::sync::Arc;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Command for Echo {
//!     fn invocations(&self) -> Vec<&str> {
//!         vec!["echo"]
//!     }
//!
//!     fn executable_in_dm(&self) -> bool {
//!         true
//!     }
//!
//!     async fn execute(&self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
//!         let text = ctx.args().join(" ");
//!         ctx.reply(&text).await?;
//!         Ok(())
//!     }
//! }
//!
//! # async fn run() -> anyhow::Result<()> {
//! let dispatcher = Dispatcher::builder(Config::default()).command(Echo)?.build();
//! let platform = Arc::new(MemoryPlatform::with_defaults("bot"));
//! let _subscriptions = dispatcher.attach(&platform)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`dispatch`]: the dispatcher, its builder and prefix resolution
//! - [`handlers`]: command and middleware traits, registry, pipeline, help
//! - [`platform`]: the platform contract and the in-memory platform
//! - [`state`]: the process-wide object store and per-dispatch extensions
//! - [`config`]: TOML configuration and validation
//! - [`metrics`] / [`telemetry`]: Prometheus metrics and tracing spans

pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod platform;
pub mod state;
pub mod telemetry;

pub use config::{Config, ConfigError};
pub use dispatch::{AttachError, DispatchOutcome, Dispatcher, DispatcherBuilder};
pub use error::{BoxError, DispatchError, ErrorKind};
pub use handlers::{Command, Context, Flow, Layer, Middleware, RegistryError};
pub use platform::{MemoryPlatform, Platform};
pub use state::{DISPATCHER_KEY, ObjectError, ObjectStore};

pub use slcmd_proto::{Argument, ArgumentError, ArgumentList, Invocation, InvocationStyle, tokenize};
