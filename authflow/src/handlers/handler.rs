//! The handler abstraction and sequential handler chains.

use crate::context::{Collaborators, RequestContext};
use crate::errors::ConfigurationError;
use crate::http::{Request, Response};
use crate::pipeline::{PipelineDefinition, Stage, StageKey};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

/// Whether the next handler in a chain should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Run the next handler.
    Continue,
    /// Stop; the request is finished.
    Halt,
}

/// A request handler built from a pipeline.
#[async_trait]
pub trait Handler: Send + Sync + Debug {
    /// Returns the handler name.
    fn name(&self) -> &str;

    /// Replaces one of the handler's stages by name.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the handler unchanged, if the handler has
    /// no stage called `stage`.
    fn override_stage(
        &self,
        stage: &str,
        replacement: Arc<dyn Stage>,
    ) -> Result<(), ConfigurationError>;

    /// Handles one request.
    async fn handle(&self, ctx: &mut RequestContext) -> Flow;
}

#[async_trait]
impl<K: StageKey> Handler for PipelineDefinition<K> {
    fn name(&self) -> &str {
        PipelineDefinition::name(self)
    }

    fn override_stage(
        &self,
        stage: &str,
        replacement: Arc<dyn Stage>,
    ) -> Result<(), ConfigurationError> {
        PipelineDefinition::override_stage(self, stage, replacement)
    }

    async fn handle(&self, ctx: &mut RequestContext) -> Flow {
        let report = self.execute(ctx, Value::Null).await;
        if report.is_completed() {
            Flow::Continue
        } else {
            Flow::Halt
        }
    }
}

/// Handlers run in order while each one continues.
#[derive(Debug, Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler.
    #[must_use]
    pub fn with(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Appends a handler.
    pub fn push(&mut self, handler: Arc<dyn Handler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if the chain has no handlers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs the handlers in order. Returns `Halt` as soon as one halts.
    pub async fn run(&self, ctx: &mut RequestContext) -> Flow {
        for handler in &self.handlers {
            if handler.handle(ctx).await == Flow::Halt {
                debug!(handler = handler.name(), request_id = %ctx.id(), "Chain halted");
                return Flow::Halt;
            }
        }
        Flow::Continue
    }

    /// Runs `request` through the chain and returns the written response.
    ///
    /// `None` means no handler wrote a response, e.g. because the request
    /// was cancelled.
    pub async fn serve(
        &self,
        request: Request,
        collaborators: Arc<Collaborators>,
    ) -> Option<Response> {
        collaborators.logger.request(&request);
        let mut ctx = RequestContext::new(request, collaborators);
        self.run(&mut ctx).await;
        ctx.take_response()
    }
}
