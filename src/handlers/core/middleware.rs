//! Middleware pipeline.
//!
//! Middleware run in registration order. For each layer the pipeline skips
//! middleware not subscribed to that layer, stops silently on
//! [`Flow::Halt`], and turns the first error into a
//! [`DispatchError::Middleware`].

use super::context::Context;
use super::traits::{Command, Flow, Layer, Middleware};
use crate::error::DispatchError;
use std::sync::Arc;
use tracing::trace;

/// Ordered list of registered middleware.
#[derive(Default)]
pub struct MiddlewarePipeline {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewarePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a middleware; it runs after all previously pushed ones.
    pub fn push(&mut self, middleware: Arc<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Middleware>> {
        self.middlewares.iter()
    }

    /// Run every middleware subscribed to `layer`.
    pub async fn run_layer(
        &self,
        layer: Layer,
        command: &dyn Command,
        ctx: &mut Context<'_>,
    ) -> Result<Flow, DispatchError> {
        for mw in &self.middlewares {
            if !mw.layer().intersects(layer) {
                continue;
            }

            match mw.handle(command, ctx, layer).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Halt) => {
                    trace!(middleware = mw.name(), %layer, "Middleware halted dispatch");
                    return Ok(Flow::Halt);
                }
                Err(e) => {
                    return Err(DispatchError::Middleware {
                        middleware: mw.name().to_string(),
                        source: e.into(),
                    });
                }
            }
        }
        Ok(Flow::Continue)
    }
}

impl std::fmt::Debug for MiddlewarePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.middlewares.iter().map(|m| m.name()))
            .finish()
    }
}
