//! The stage trait and the stock stage implementations.

use crate::context::RequestContext;
use crate::errors::ErrorRecord;
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use std::fmt::Debug;

/// The value passed from one stage to the next.
pub type StageValue = Value;

/// What a stage produces.
pub type StageResult = Result<StageValue, ErrorRecord>;

/// Future returned by an async stage closure, borrowing the context.
pub type StageFuture<'a> = BoxFuture<'a, StageResult>;

/// One step of a pipeline.
///
/// A stage receives the previous stage's output and may read or change the
/// request context. Returning an error ends the execution.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// Runs the stage.
    async fn run(&self, ctx: &mut RequestContext, input: StageValue) -> StageResult;
}

/// A stage backed by a synchronous closure.
pub struct SyncFnStage<F> {
    name: String,
    func: F,
}

impl<F> Debug for SyncFnStage<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncFnStage").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<F> Stage for SyncFnStage<F>
where
    F: Fn(&mut RequestContext, StageValue) -> StageResult + Send + Sync,
{
    async fn run(&self, ctx: &mut RequestContext, input: StageValue) -> StageResult {
        (self.func)(ctx, input)
    }
}

/// Wraps a synchronous closure as a stage.
pub fn stage_fn<F>(name: impl Into<String>, func: F) -> SyncFnStage<F>
where
    F: Fn(&mut RequestContext, StageValue) -> StageResult + Send + Sync,
{
    SyncFnStage {
        name: name.into(),
        func,
    }
}

/// A stage backed by an async closure.
///
/// The closure returns a boxed future that may borrow the context:
///
/// ```ignore
/// let stage = FnStage::new("lookup", |ctx, input| {
///     Box::pin(async move {
///         let record = ctx.store().fetch("users", "alice").await?;
///         Ok(record)
///     })
/// });
/// ```
pub struct FnStage<F> {
    name: String,
    func: F,
}

impl<F> FnStage<F>
where
    F: for<'a> Fn(&'a mut RequestContext, StageValue) -> StageFuture<'a> + Send + Sync,
{
    /// Creates an async function stage.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Debug for FnStage<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStage").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<F> Stage for FnStage<F>
where
    F: for<'a> Fn(&'a mut RequestContext, StageValue) -> StageFuture<'a> + Send + Sync,
{
    async fn run(&self, ctx: &mut RequestContext, input: StageValue) -> StageResult {
        (self.func)(ctx, input).await
    }
}

/// A placeholder for a stage the integrator must supply.
///
/// Always fails with `NotImplemented`, which answers `501`.
#[derive(Debug, Clone)]
pub struct NotImplementedStage {
    name: String,
}

impl NotImplementedStage {
    /// Creates a placeholder stage.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the stage name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Stage for NotImplementedStage {
    async fn run(&self, _ctx: &mut RequestContext, _input: StageValue) -> StageResult {
        Err(ErrorRecord::not_implemented().with_info("stage", Value::String(self.name.clone())))
    }
}
