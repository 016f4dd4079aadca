//! Integration tests for the built-in help command, the shared object store
//! and what commands see in their context.

mod common;

use async_trait::async_trait;
use common::{EventLog, Scripted, TestBot, alice};
use slcmd::{
    Command, Config, Context, DispatchOutcome, Dispatcher, ErrorKind, ObjectError, RegistryError,
};
use std::sync::atomic::{AtomicU64, Ordering};

fn with_help() -> Config {
    Config {
        help_command: true,
        ..Config::default()
    }
}

#[tokio::test]
async fn test_help_lists_commands() {
    let log = EventLog::default();
    let bot = TestBot::new(with_help(), |b| b.command(Scripted::new(&["echo"], &log)));

    assert_eq!(bot.send("!help").await, DispatchOutcome::Completed);
    let replies = bot.replies();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].starts_with("Commands:"));
    assert!(replies[0].contains("\n  echo"));
    assert!(replies[0].contains("\n  help - "));
}

#[tokio::test]
async fn test_help_for_one_command() {
    let log = EventLog::default();
    let bot = TestBot::new(with_help(), |b| b.command(Scripted::new(&["echo", "say"], &log)));

    bot.send("!? say").await;
    bot.send("!h nope").await;

    assert_eq!(bot.replies(), vec!["echo (aliases: say)", "Unknown command: nope"]);
}

#[tokio::test]
async fn test_help_works_in_direct_messages() {
    let config = Config {
        allow_dm: true,
        ..with_help()
    };
    let bot = TestBot::new(config, Ok);

    assert_eq!(
        bot.send_as("dm1", &alice(), "!help help").await,
        DispatchOutcome::Completed
    );
    assert!(bot.replies()[0].starts_with("help (aliases: h, ?)"));
}

#[test]
fn test_help_invocations_conflict() {
    let log = EventLog::default();
    let err = Dispatcher::builder(with_help())
        .command(Scripted::new(&["history", "h"], &log))
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::Duplicate {
            invocation: "h".to_string()
        }
    );

    // Without the help command the same registration is fine.
    assert!(
        Dispatcher::builder(Config::default())
            .command(Scripted::new(&["history", "h"], &log))
            .is_ok()
    );
}

/// Increments a shared counter from the object store.
struct Count;

#[async_trait]
impl Command for Count {
    fn invocations(&self) -> Vec<&str> {
        vec!["count"]
    }

    fn executable_in_dm(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        let dispatcher = ctx
            .dispatcher()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no dispatcher in context"))?;
        let counter = dispatcher.get_object::<AtomicU64>("counter")?;
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        ctx.reply(&n.to_string()).await?;
        Ok(())
    }
}

#[tokio::test]
async fn test_object_store_shared_across_dispatches() {
    let bot = TestBot::new(Config::default(), |b| {
        Ok(b.object("counter", AtomicU64::new(0)).command(Count)?)
    });

    bot.send("!count").await;
    bot.send("!count").await;

    assert_eq!(bot.replies(), vec!["1", "2"]);
    let counter = bot.dispatcher.get_object::<AtomicU64>("counter").unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_object_type_mismatch_fails_command() {
    let bot = TestBot::new(Config::default(), |b| {
        Ok(b.object("counter", "not a counter".to_string()).command(Count)?)
    });

    assert_eq!(
        bot.send("!count").await,
        DispatchOutcome::Failed(ErrorKind::CommandExec)
    );
    let err = bot.dispatcher.get_object::<AtomicU64>("counter").unwrap_err();
    assert!(matches!(err, ObjectError::TypeMismatch { .. }));

    bot.dispatcher.set_object("counter", AtomicU64::new(10));
    bot.send("!count").await;
    assert_eq!(bot.replies(), vec!["11"]);
}

/// Describes what the context holds.
struct Inspect;

#[async_trait]
impl Command for Inspect {
    fn invocations(&self) -> Vec<&str> {
        vec!["inspect"]
    }

    fn executable_in_dm(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        let summary = format!(
            "channel={} guild={} dm={} edit={} author={} args={}",
            ctx.channel.as_ref().map(|c| c.name.as_str()).unwrap_or("-"),
            ctx.guild.as_ref().map(|g| g.name.as_str()).unwrap_or("-"),
            ctx.is_dm,
            ctx.is_edit,
            ctx.author().map(|a| a.username.as_str()).unwrap_or("-"),
            ctx.args().len(),
        );
        ctx.reply(&summary).await?;
        Ok(())
    }
}

#[tokio::test]
async fn test_context_contents() {
    let config = Config {
        allow_dm: true,
        execute_on_edit: true,
        ..Config::default()
    };
    let bot = TestBot::new(config, |b| b.command(Inspect));

    bot.send(r#"!inspect a "b c""#).await;
    bot.send_as("dm1", &alice(), "!inspect").await;
    let message = bot.platform.post("c1", &alice(), "!inspect x");
    bot.dispatch(&message, true).await;

    assert_eq!(
        bot.replies(),
        vec![
            "channel=general guild=Straylight dm=false edit=false author=alice args=2",
            "channel= guild=- dm=true edit=false author=alice args=0",
            "channel=general guild=Straylight dm=false edit=true author=alice args=1",
        ]
    );
}
