//! Telemetry utilities for command timing and dispatch tracing.

use std::time::Instant;

/// Guard for timing command execution and recording metrics.
///
/// Records command latency when dropped.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_command(&self.command, duration);
    }
}

/// Standardized span constructors for dispatch observability.
pub mod spans {
    use crate::platform::Message;
    use tracing::{Span, debug_span};

    /// Span covering the dispatch of one message.
    pub fn dispatch(message: &Message, is_edit: bool) -> Span {
        let author = message.author.as_ref().map(|a| a.id.as_str());
        debug_span!(
            "command.dispatch",
            message_id = %message.id,
            channel_id = %message.channel_id,
            author_id = author,
            is_edit,
        )
    }

    /// Span covering a command execution.
    pub fn exec(invocation: &str) -> Span {
        debug_span!("command.exec", invocation = %invocation)
    }
}
