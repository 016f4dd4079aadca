//! Built-in `help` command.
//!
//! Without arguments it lists every registered command grouped by
//! [`Command::group`]. With an argument it shows the details of one command.

use super::core::{Command, Context};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

/// Lists commands, or describes one.
#[derive(Debug, Default, Clone, Copy)]
pub struct HelpCommand;

impl HelpCommand {
    fn listing(commands: &[Arc<dyn Command>]) -> String {
        let mut groups: BTreeMap<&str, Vec<&Arc<dyn Command>>> = BTreeMap::new();
        for command in commands {
            groups.entry(command.group()).or_default().push(command);
        }

        let mut out = String::from("Commands:");
        for (group, mut members) in groups {
            members.sort_by_key(|c| primary(c.as_ref()).to_string());
            let _ = write!(out, "\n[{group}]");
            for command in members {
                let name = primary(command.as_ref());
                match command.description() {
                    "" => {
                        let _ = write!(out, "\n  {name}");
                    }
                    desc => {
                        let _ = write!(out, "\n  {name} - {desc}");
                    }
                }
            }
        }
        out
    }

    fn details(command: &dyn Command) -> String {
        let mut out = primary(command).to_string();
        let aliases = command.invocations();
        if aliases.len() > 1 {
            let _ = write!(out, " (aliases: {})", aliases[1..].join(", "));
        }
        if !command.description().is_empty() {
            let _ = write!(out, "\n{}", command.description());
        }
        if let Some(usage) = command.help() {
            let _ = write!(out, "\nUsage: {usage}");
        }
        if !command.executable_in_dm() {
            out.push_str("\nNot available in direct messages.");
        }
        out
    }
}

fn primary(command: &dyn Command) -> &str {
    command.invocations().first().copied().unwrap_or_default()
}

#[async_trait]
impl Command for HelpCommand {
    fn invocations(&self) -> Vec<&str> {
        vec!["help", "h", "?"]
    }

    fn executable_in_dm(&self) -> bool {
        true
    }

    fn description(&self) -> &str {
        "Show the command list or details of one command"
    }

    fn help(&self) -> Option<&str> {
        Some("help [command]")
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        let dispatcher = ctx
            .dispatcher()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("help invoked outside a dispatch"))?;

        let reply = match ctx.args().get(0).as_str() {
            "" => Self::listing(dispatcher.instances()),
            name => match dispatcher.command(name) {
                Some(command) => Self::details(command.as_ref()),
                None => format!("Unknown command: {name}"),
            },
        };

        ctx.reply(&reply).await?;
        Ok(())
    }
}
