//! Command handling.
//!
//! [`core`] holds the traits and infrastructure every command goes through;
//! [`help`] is the optional built-in help command.

pub mod core;
pub mod help;

pub use self::core::{
    Command, CommandRegistry, Context, Flow, Layer, Middleware, MiddlewarePipeline, RegistryError,
};
pub use help::HelpCommand;
