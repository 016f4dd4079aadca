//! slcmd - console front end for the command dispatcher.
//!
//! Reads lines from stdin, posts each one as a chat message from a console
//! user into an in-memory guild channel, and prints what the bot sends back.
//!
//! Lines starting with `/` are console directives:
//! - `/edit <text>`: edit the last posted message
//! - `/dm <text>`: post into the direct-message channel
//! - `/metrics`: print Prometheus metrics
//! - `/quit`: exit

mod console;

use slcmd::config::{LogFormat, validate};
use slcmd::platform::{EventKind, MessageEvent, User};
use slcmd::{Config, ConfigError, Dispatcher, MemoryPlatform, Platform, metrics};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const CHANNEL_ID: &str = "c1";
const DM_CHANNEL_ID: &str = "dm1";

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    match config.log.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "slcmd.toml".to_string());

    let (config, missing) = match Config::load(&config_path) {
        Ok(config) => (config, false),
        Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            (Config::default(), true)
        }
        Err(e) => return Err(e.into()),
    };

    init_tracing(&config);
    if missing {
        warn!(path = %config_path, "Config file not found, using defaults");
    }

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {}", errors.len(), config_path);
    }

    metrics::init()?;

    info!(prefix = %config.prefix, "Starting slcmd");

    let dispatcher = Dispatcher::builder(config)
        .command(console::Ping)?
        .command(console::Echo)?
        .command(console::Roll)?
        .command(console::Stats)?
        .middleware(console::LogInvocations)
        .build();

    let platform = Arc::new(MemoryPlatform::with_defaults("slcmd"));
    let mut subscriptions = dispatcher.attach(&platform)?;

    // Print everything the bot says.
    let self_id = platform.self_id().to_string();
    subscriptions.push(platform.subscribe(
        EventKind::MessageCreate,
        Arc::new(move |event: MessageEvent| {
            let message = &event.message;
            if message.author.as_ref().is_some_and(|a| a.id == self_id) {
                for line in message.content.lines() {
                    println!("[{}] {}", message.channel_id, line);
                }
            }
        }),
    ));

    let user = User {
        id: "console".to_string(),
        username: std::env::var("USER").unwrap_or_else(|_| "console".to_string()),
        bot: false,
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_id: Option<String> = None;

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };

        match line.split_once(' ').unwrap_or((line.as_str(), "")) {
            ("/quit", _) => break,
            ("/metrics", _) => print!("{}", metrics::gather_metrics()),
            ("/edit", text) => match last_id.as_deref() {
                Some(id) => {
                    if let Err(e) = platform.edit(id, text) {
                        warn!(error = %e, "Edit failed");
                    }
                }
                None => warn!("Nothing to edit"),
            },
            ("/dm", text) => {
                last_id = Some(platform.post(DM_CHANNEL_ID, &user, text).id);
            }
            _ => {
                last_id = Some(platform.post(CHANNEL_ID, &user, &line).id);
            }
        }
    }

    for subscription in subscriptions {
        subscription.unsubscribe();
    }
    info!("Shutting down");
    Ok(())
}
