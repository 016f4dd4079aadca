//! Integration test common infrastructure.
//!
//! Provides a [`TestBot`] wrapping a dispatcher and an in-memory platform,
//! scriptable commands and middleware that record what ran, and an error
//! report collector.

pub mod bot;
pub mod scripted;

#[allow(unused_imports)]
pub use bot::{BOT_ID, Report, Reports, TestBot, alice, bot_user, wait_until};
#[allow(unused_imports)]
pub use scripted::{EventLog, Outcome, Probe, Scripted};
