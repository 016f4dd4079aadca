//! Core handler infrastructure.
//!
//! The fundamental types of the command system: the [`Command`] and
//! [`Middleware`] traits, the per-dispatch [`Context`], the
//! [`CommandRegistry`] and the [`MiddlewarePipeline`].

pub mod context;
pub mod middleware;
pub mod registry;
pub mod traits;

pub use context::Context;
pub use middleware::MiddlewarePipeline;
pub use registry::{CommandRegistry, RegistryError};
pub use traits::{Command, Flow, Layer, Middleware};
