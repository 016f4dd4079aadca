//! Commands and middleware whose behaviour is chosen by the test.

use async_trait::async_trait;
use parking_lot::Mutex;
use slcmd::{Command, Context, Flow, Layer, Middleware};
use std::sync::Arc;

/// Shared, ordered record of what ran.
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// What a scripted command or middleware does when it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Halt,
    Fail,
}

/// A command that logs `exec:<prefix><invocation>:<args joined by ','>`,
/// replies with its arguments joined by spaces, and optionally fails.
pub struct Scripted {
    invocations: Vec<&'static str>,
    dm: bool,
    fails: bool,
    log: EventLog,
}

#[allow(dead_code)]
impl Scripted {
    pub fn new(invocations: &[&'static str], log: &EventLog) -> Self {
        Self {
            invocations: invocations.to_vec(),
            dm: true,
            fails: false,
            log: Arc::clone(log),
        }
    }

    /// Not executable in direct messages.
    pub fn guild_only(mut self) -> Self {
        self.dm = false;
        self
    }

    /// Return an error after logging.
    pub fn failing(mut self) -> Self {
        self.fails = true;
        self
    }
}

#[async_trait]
impl Command for Scripted {
    fn invocations(&self) -> Vec<&str> {
        self.invocations.clone()
    }

    fn executable_in_dm(&self) -> bool {
        self.dm
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        let args: Vec<&str> = ctx.args().iter().map(|a| a.as_str()).collect();
        self.log.lock().push(format!(
            "exec:{}{}:{}",
            ctx.prefix.as_deref().unwrap_or_default(),
            ctx.invocation.as_deref().unwrap_or_default(),
            args.join(",")
        ));
        if self.fails {
            anyhow::bail!("scripted failure");
        }
        let reply = args.join(" ");
        ctx.reply(&reply).await?;
        Ok(())
    }
}

/// A middleware that logs `<name>:<layer>` and then does what it was told.
pub struct Probe {
    name: &'static str,
    layer: Layer,
    outcome: Outcome,
    log: EventLog,
}

#[allow(dead_code)]
impl Probe {
    pub fn new(name: &'static str, layer: Layer, outcome: Outcome, log: &EventLog) -> Self {
        Self {
            name,
            layer,
            outcome,
            log: Arc::clone(log),
        }
    }

    pub fn pass(name: &'static str, layer: Layer, log: &EventLog) -> Self {
        Self::new(name, layer, Outcome::Continue, log)
    }
}

#[async_trait]
impl Middleware for Probe {
    fn layer(&self) -> Layer {
        self.layer
    }

    fn name(&self) -> &str {
        self.name
    }

    async fn handle(
        &self,
        _command: &dyn Command,
        _ctx: &mut Context<'_>,
        layer: Layer,
    ) -> anyhow::Result<Flow> {
        self.log.lock().push(format!("{}:{}", self.name, layer));
        match self.outcome {
            Outcome::Continue => Ok(Flow::Continue),
            Outcome::Halt => Ok(Flow::Halt),
            Outcome::Fail => anyhow::bail!("{} rejected the command", self.name),
        }
    }
}
