//! Configuration loading and management.
//!
//! - [`types`]: the [`Config`] snapshot and its loader
//! - [`defaults`]: serde default functions
//! - [`validation`]: startup checks run before the dispatcher is built

mod defaults;
mod types;
pub mod validation;

pub use types::{Config, ConfigError, LogConfig, LogFormat};
pub use validation::{ValidationError, validate};
