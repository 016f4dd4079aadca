//! Dispatcher plus in-memory platform, with collected error reports.

use parking_lot::Mutex;
use slcmd::dispatch::DispatcherBuilder;
use slcmd::platform::{Message, User};
use slcmd::{
    Config, Context, DispatchError, DispatchOutcome, Dispatcher, ErrorKind, MemoryPlatform,
    RegistryError,
};
use std::sync::Arc;
use std::time::Duration;

/// Account id of the bot session.
pub const BOT_ID: &str = "bot";

pub fn alice() -> User {
    User {
        id: "u1".to_string(),
        username: "alice".to_string(),
        bot: false,
    }
}

#[allow(dead_code)]
pub fn bot_user(id: &str) -> User {
    User {
        id: id.to_string(),
        username: id.to_string(),
        bot: true,
    }
}

/// One call of the error reporter.
#[derive(Debug, Clone)]
pub struct Report {
    pub kind: ErrorKind,
    pub error: String,
    pub invocation: Option<String>,
    pub had_channel: bool,
    pub had_guild: bool,
    pub had_dispatcher: bool,
}

/// Collects error reports.
#[derive(Clone, Default)]
pub struct Reports(Arc<Mutex<Vec<Report>>>);

#[allow(dead_code)]
impl Reports {
    pub fn reporter(&self) -> impl Fn(&Context<'_>, ErrorKind, &DispatchError) + Send + Sync + 'static {
        let reports = Arc::clone(&self.0);
        move |ctx: &Context<'_>, kind: ErrorKind, err: &DispatchError| {
            reports.lock().push(Report {
                kind,
                error: err.to_string(),
                invocation: ctx.invocation.clone(),
                had_channel: ctx.channel.is_some(),
                had_guild: ctx.guild.is_some(),
                had_dispatcher: ctx.dispatcher().is_some(),
            });
        }
    }

    pub fn all(&self) -> Vec<Report> {
        self.0.lock().clone()
    }

    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.0.lock().iter().map(|r| r.kind).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }
}

/// A dispatcher wired to a [`MemoryPlatform`] with guild `g1`, text channel
/// `c1` and direct-message channel `dm1`.
pub struct TestBot {
    pub platform: Arc<MemoryPlatform>,
    pub dispatcher: Arc<Dispatcher>,
    pub reports: Reports,
}

#[allow(dead_code)]
impl TestBot {
    pub fn new(
        config: Config,
        setup: impl FnOnce(DispatcherBuilder) -> Result<DispatcherBuilder, RegistryError>,
    ) -> Self {
        let reports = Reports::default();
        let builder = Dispatcher::builder(config).on_error(reports.reporter());
        let dispatcher = setup(builder).expect("dispatcher setup failed").build();
        Self {
            platform: Arc::new(MemoryPlatform::with_defaults(BOT_ID)),
            dispatcher,
            reports,
        }
    }

    /// Post `content` from alice in `c1` and dispatch it.
    pub async fn send(&self, content: &str) -> DispatchOutcome {
        self.send_as("c1", &alice(), content).await
    }

    /// Post a message and dispatch it directly (no event subscription).
    pub async fn send_as(&self, channel_id: &str, author: &User, content: &str) -> DispatchOutcome {
        let message = self.platform.post(channel_id, author, content);
        self.dispatch(&message, false).await
    }

    pub async fn dispatch(&self, message: &Message, is_edit: bool) -> DispatchOutcome {
        self.dispatcher
            .dispatch(self.platform.as_ref(), message, is_edit)
            .await
    }

    /// Contents of every message the bot sent.
    pub fn replies(&self) -> Vec<String> {
        self.platform
            .sent_messages()
            .into_iter()
            .map(|m| m.content)
            .collect()
    }
}

/// Poll `cond` until it holds or roughly one second passed.
#[allow(dead_code)]
pub async fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}
