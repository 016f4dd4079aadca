//! Shared state module.
//!
//! Contains the process-wide [`ObjectStore`] and the per-dispatch
//! [`Extensions`] map, both keyed by string with values of any type.

pub(crate) mod dashmap_ext;
mod extensions;
mod objects;

pub use extensions::Extensions;
pub use objects::ObjectStore;

use thiserror::Error;

/// Key under which every dispatch's [`Extensions`] hold the
/// `Arc<Dispatcher>` that created it.
pub const DISPATCHER_KEY: &str = "slcmd.dispatcher";

/// Errors from typed object lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    #[error("no object stored under {key:?}")]
    Missing { key: String },

    #[error("object {key:?} is not a {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}
