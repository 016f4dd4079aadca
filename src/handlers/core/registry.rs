//! Command registry.
//!
//! The `CommandRegistry` maps every invocation of every registered command to
//! that command and keeps usage counters for the statistics listing.

use super::traits::Command;
use slcmd_proto::fold_invocation;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::debug;

/// Errors raised while registering commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("command invocation {invocation:?} is already registered")]
    Duplicate { invocation: String },

    #[error("command declares no invocations")]
    NoInvocations,
}

struct Entry {
    command: Arc<dyn Command>,
    uses: Arc<AtomicU64>,
}

/// Registry of commands keyed by (optionally folded) invocation.
pub struct CommandRegistry {
    case_insensitive: bool,
    entries: HashMap<String, Entry>,
    instances: Vec<Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new(case_insensitive: bool) -> Self {
        Self {
            case_insensitive,
            entries: HashMap::new(),
            instances: Vec::new(),
        }
    }

    /// Whether lookups fold case.
    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    fn key(&self, invocation: &str) -> String {
        if self.case_insensitive {
            fold_invocation(invocation).into_owned()
        } else {
            invocation.to_string()
        }
    }

    /// Register a command under all of its invocations.
    ///
    /// Registration is all-or-nothing: if any invocation (after folding)
    /// collides with an existing one, or two of the command's own invocations
    /// collide with each other, nothing is inserted.
    pub fn register(&mut self, command: Arc<dyn Command>) -> Result<(), RegistryError> {
        let invocations = command.invocations();
        if invocations.is_empty() {
            return Err(RegistryError::NoInvocations);
        }

        let mut keys: Vec<String> = Vec::with_capacity(invocations.len());
        for invocation in &invocations {
            let key = self.key(invocation);
            if self.entries.contains_key(&key) || keys.contains(&key) {
                return Err(RegistryError::Duplicate {
                    invocation: (*invocation).to_string(),
                });
            }
            keys.push(key);
        }

        // All invocations of one command share a counter.
        let uses = Arc::new(AtomicU64::new(0));
        for key in keys {
            debug!(invocation = %key, "Registered command");
            self.entries.insert(
                key,
                Entry {
                    command: Arc::clone(&command),
                    uses: Arc::clone(&uses),
                },
            );
        }
        self.instances.push(command);
        Ok(())
    }

    /// Look up a command by invocation.
    pub fn lookup(&self, invocation: &str) -> Option<&Arc<dyn Command>> {
        self.entries.get(&self.key(invocation)).map(|e| &e.command)
    }

    /// Look up a command and count the use.
    pub(crate) fn lookup_counted(&self, invocation: &str) -> Option<&Arc<dyn Command>> {
        let entry = self.entries.get(&self.key(invocation))?;
        entry.uses.fetch_add(1, Ordering::Relaxed);
        Some(&entry.command)
    }

    /// Invocation → command map, in no particular order.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &Arc<dyn Command>)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), &e.command))
    }

    /// Each registered command exactly once, in registration order.
    pub fn instances(&self) -> &[Arc<dyn Command>] {
        &self.instances
    }

    /// Number of registered invocations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Usage counts of commands that were used at least once.
    ///
    /// Keyed by primary invocation, sorted by count (descending).
    pub fn command_stats(&self) -> Vec<(String, u64)> {
        let mut stats: Vec<_> = self
            .instances
            .iter()
            .filter_map(|command| {
                let primary = command.invocations().first().map(|s| self.key(s))?;
                let uses = self.entries.get(&primary)?.uses.load(Ordering::Relaxed);
                (uses > 0).then_some((primary, uses))
            })
            .collect();

        stats.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        stats
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("CommandRegistry")
            .field("case_insensitive", &self.case_insensitive)
            .field("invocations", &keys)
            .finish()
    }
}
