//! Demo commands and middleware for the console binary.

use async_trait::async_trait;
use rand::Rng;
use slcmd::{Command, Context, Flow, Layer, Middleware};
use std::time::Instant;
use tracing::info;

/// Replies `pong`.
pub struct Ping;

#[async_trait]
impl Command for Ping {
    fn invocations(&self) -> Vec<&str> {
        vec!["ping", "p"]
    }

    fn executable_in_dm(&self) -> bool {
        true
    }

    fn description(&self) -> &str {
        "Check that the bot is alive"
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        ctx.reply("pong").await?;
        Ok(())
    }
}

/// Replies with its arguments.
pub struct Echo;

#[async_trait]
impl Command for Echo {
    fn invocations(&self) -> Vec<&str> {
        vec!["echo", "say"]
    }

    fn executable_in_dm(&self) -> bool {
        true
    }

    fn description(&self) -> &str {
        "Repeat the given text"
    }

    fn help(&self) -> Option<&str> {
        Some("echo <text...>")
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        if ctx.args().is_empty() {
            anyhow::bail!("nothing to echo");
        }
        let text = ctx.args().join(" ");
        ctx.reply(&text).await?;
        Ok(())
    }
}

/// Rolls dice written as `NdM`.
pub struct Roll;

impl Roll {
    const MAX_DICE: i64 = 100;
    const MAX_SIDES: i64 = 1000;

    fn parse(spec: &str) -> anyhow::Result<(i64, i64)> {
        let (count, sides) = match spec {
            "" => ("1", "6"),
            spec => spec
                .split_once(['d', 'D'])
                .ok_or_else(|| anyhow::anyhow!("expected NdM, got {spec:?}"))?,
        };
        let count = match count {
            "" => 1,
            count => slcmd::Argument::new(count).as_int()?,
        };
        let sides = slcmd::Argument::new(sides).as_int()?;

        anyhow::ensure!(
            (1..=Self::MAX_DICE).contains(&count),
            "dice count must be between 1 and {}",
            Self::MAX_DICE
        );
        anyhow::ensure!(
            (2..=Self::MAX_SIDES).contains(&sides),
            "sides must be between 2 and {}",
            Self::MAX_SIDES
        );
        Ok((count, sides))
    }
}

#[async_trait]
impl Command for Roll {
    fn invocations(&self) -> Vec<&str> {
        vec!["roll", "r"]
    }

    fn executable_in_dm(&self) -> bool {
        true
    }

    fn description(&self) -> &str {
        "Roll dice"
    }

    fn help(&self) -> Option<&str> {
        Some("roll [NdM]")
    }

    fn group(&self) -> &str {
        "Fun"
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        let (count, sides) = Self::parse(ctx.args().get(0).as_str())?;
        let rolls: Vec<i64> = {
            let mut rng = rand::thread_rng();
            (0..count).map(|_| rng.gen_range(1..=sides)).collect()
        };
        let total: i64 = rolls.iter().sum();
        let shown: Vec<String> = rolls.iter().map(i64::to_string).collect();
        ctx.reply(&format!("{count}d{sides}: {} = {total}", shown.join(" + ")))
            .await?;
        Ok(())
    }
}

/// Lists how often each command was used.
pub struct Stats;

#[async_trait]
impl Command for Stats {
    fn invocations(&self) -> Vec<&str> {
        vec!["stats"]
    }

    fn executable_in_dm(&self) -> bool {
        false
    }

    fn description(&self) -> &str {
        "Show command usage"
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        let stats = ctx
            .dispatcher()
            .map(|d| d.command_stats())
            .unwrap_or_default();
        let lines: Vec<String> = stats
            .iter()
            .map(|(name, uses)| format!("{name}: {uses}"))
            .collect();
        ctx.reply(&lines.join("\n")).await?;
        Ok(())
    }
}

/// Logs every command with its author and run time.
pub struct LogInvocations;

const STARTED_KEY: &str = "console.started";

#[async_trait]
impl Middleware for LogInvocations {
    fn layer(&self) -> Layer {
        Layer::BOTH
    }

    fn name(&self) -> &str {
        "log_invocations"
    }

    async fn handle(
        &self,
        _command: &dyn Command,
        ctx: &mut Context<'_>,
        layer: Layer,
    ) -> anyhow::Result<Flow> {
        if layer == Layer::BEFORE_COMMAND {
            ctx.extensions.set(STARTED_KEY, Instant::now());
            return Ok(Flow::Continue);
        }

        let elapsed = ctx.extensions.get::<Instant>(STARTED_KEY)?.elapsed();
        info!(
            invocation = ctx.invocation.as_deref().unwrap_or_default(),
            author = ctx.author().map(|a| a.username.as_str()),
            args = ctx.args().len(),
            elapsed_us = elapsed.as_micros() as u64,
            "Command executed"
        );
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_parse() {
        assert_eq!(Roll::parse("").unwrap(), (1, 6));
        assert_eq!(Roll::parse("2d20").unwrap(), (2, 20));
        assert_eq!(Roll::parse("d8").unwrap(), (1, 8));
        assert_eq!(Roll::parse("3D4").unwrap(), (3, 4));
        assert!(Roll::parse("20").is_err());
        assert!(Roll::parse("xd6").is_err());
        assert!(Roll::parse("0d6").is_err());
        assert!(Roll::parse("1d1").is_err());
        assert!(Roll::parse("101d6").is_err());
    }
}
