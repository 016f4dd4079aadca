//! # slcmd-proto
//!
//! Text-level parsing for chat command dispatch: turning a message body into
//! quote-aware tokens, splitting those tokens into an invocation name and
//! arguments, and coercing individual arguments into typed values.
//!
//! ## Quick Start
//!
//! ```rust
//! use slcmd_proto::{tokenize, Invocation, InvocationStyle};
//!
//! let tokens = tokenize(r#"!ban "John Doe" 10"#);
//! let invocation = Invocation::extract(tokens, "!", InvocationStyle::Attached);
//!
//! assert_eq!(invocation.name, "ban");
//! assert_eq!(invocation.args.get(0).as_str(), "John Doe");
//! assert_eq!(invocation.args.get(1).as_int().unwrap(), 10);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod args;
pub mod casemap;
pub mod error;
pub mod invocation;
pub mod tokenize;

pub use self::args::{Argument, ArgumentList};
pub use self::casemap::fold_invocation;
pub use self::error::ArgumentError;
pub use self::invocation::{Invocation, InvocationStyle};
pub use self::tokenize::tokenize;
