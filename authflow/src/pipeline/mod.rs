//! Pipelines: fixed, named stage lists run in order.
//!
//! A [`PipelineDefinition`] is built once with its closed set of
//! [`StageKey`]s. Integrators replace individual stages by name before
//! serving; [`PipelineDefinition::execute`] runs one request through it.

mod definition;
mod executor;
mod stage;

pub use definition::{PipelineDefinition, PipelineDefinitionBuilder, StageKey};
pub use executor::{ExecutionReport, ExecutionState};
pub use stage::{
    stage_fn, FnStage, NotImplementedStage, Stage, StageFuture, StageResult, StageValue,
    SyncFnStage,
};
