//! Command and middleware traits.
//!
//! Both are small, object-safe capability sets. The dispatcher stores them as
//! `Arc<dyn Command>` / `Arc<dyn Middleware>` and never inspects concrete
//! types.
//!
//! ## Commands
//!
//! A [`Command`] names the invocations it answers to, says whether it may run
//! in direct-message channels, and executes against a [`Context`].
//!
//! ## Middleware
//!
//! A [`Middleware`] subscribes to one or both [`Layer`]s and returns a
//! [`Flow`] deciding whether dispatch continues. Returning an error aborts the
//! dispatch and is reported as a middleware failure; returning
//! [`Flow::Halt`] aborts silently (permission checks, cooldowns).

use super::context::Context;
use async_trait::async_trait;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

// ============================================================================
// Command
// ============================================================================

/// A command that can be invoked from a chat message.
///
/// # Example
///
/// ```ignore
/// pub struct PingCommand;
///
/// #[async_trait]
/// impl Command for PingCommand {
///     fn invocations(&self) -> Vec<&str> {
///         vec!["ping", "p"]
///     }
///
///     fn executable_in_dm(&self) -> bool {
///         true
///     }
///
///     async fn execute(&self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
///         ctx.reply("pong").await?;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Command: Send + Sync {
    /// Names this command answers to. The first one is its primary name.
    fn invocations(&self) -> Vec<&str>;

    /// Whether the command may run in direct or group-direct channels.
    fn executable_in_dm(&self) -> bool;

    /// One-line description shown in the command listing.
    fn description(&self) -> &str {
        ""
    }

    /// Usage text shown by `help <command>`.
    fn help(&self) -> Option<&str> {
        None
    }

    /// Group under which the command is listed.
    fn group(&self) -> &str {
        "General"
    }

    /// Run the command.
    async fn execute(&self, ctx: &mut Context<'_>) -> anyhow::Result<()>;
}

impl fmt::Debug for dyn Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("invocations", &self.invocations())
            .field("executable_in_dm", &self.executable_in_dm())
            .finish()
    }
}

// ============================================================================
// Layers
// ============================================================================

/// Set of dispatch points a middleware subscribes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Layer(u8);

impl Layer {
    /// Subscribed to nothing; the middleware never runs.
    pub const NONE: Self = Self(0);
    /// Before the command executes.
    pub const BEFORE_COMMAND: Self = Self(1);
    /// After the command executed successfully.
    pub const AFTER_COMMAND: Self = Self(1 << 1);
    /// Both points.
    pub const BOTH: Self = Self(Self::BEFORE_COMMAND.0 | Self::AFTER_COMMAND.0);

    /// Raw bit representation.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether all bits of `other` are set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether any bit of `other` is set.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Static label for logs.
    pub fn as_str(self) -> &'static str {
        match self.0 {
            0 => "none",
            1 => "before_command",
            2 => "after_command",
            _ => "both",
        }
    }
}

impl BitOr for Layer {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Layer {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Whether dispatch proceeds after a middleware ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    Continue,
    /// Stop the dispatch without reporting an error.
    Halt,
}

impl Flow {
    #[inline]
    pub fn is_continue(self) -> bool {
        self == Self::Continue
    }
}

impl From<bool> for Flow {
    fn from(next: bool) -> Self {
        if next { Self::Continue } else { Self::Halt }
    }
}

/// Code that runs around command execution.
///
/// # Example
///
/// ```ignore
/// pub struct OwnerOnly;
///
/// #[async_trait]
/// impl Middleware for OwnerOnly {
///     fn layer(&self) -> Layer {
///         Layer::BEFORE_COMMAND
///     }
///
///     async fn handle(
///         &self,
///         _cmd: &dyn Command,
///         ctx: &mut Context<'_>,
///         _layer: Layer,
///     ) -> anyhow::Result<Flow> {
///         let owner = ctx.guild.as_ref().map(|g| g.owner_id.as_str());
///         Ok((ctx.author_id() == owner).into())
///     }
/// }
/// ```
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Layers this middleware runs in.
    fn layer(&self) -> Layer;

    /// Name used in logs and error reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Inspect (and possibly annotate) the dispatch at `layer`.
    async fn handle(
        &self,
        command: &dyn Command,
        ctx: &mut Context<'_>,
        layer: Layer,
    ) -> anyhow::Result<Flow>;
}
