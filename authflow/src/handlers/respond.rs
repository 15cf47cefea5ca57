//! Terminal stages that write the response.

use crate::context::RequestContext;
use crate::pipeline::{Stage, StageResult, StageValue};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Negotiates and writes the input value.
#[derive(Debug, Clone, Copy, Default)]
pub struct RespondStage;

#[async_trait]
impl Stage for RespondStage {
    async fn run(&self, ctx: &mut RequestContext, input: StageValue) -> StageResult {
        ctx.respond(&input);
        Ok(input)
    }
}

/// Negotiates and writes `{"token": input}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RespondToken;

#[async_trait]
impl Stage for RespondToken {
    async fn run(&self, ctx: &mut RequestContext, input: StageValue) -> StageResult {
        ctx.respond(&json!({ "token": input }));
        Ok(input)
    }
}

/// Writes an empty `200`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RespondOk;

#[async_trait]
impl Stage for RespondOk {
    async fn run(&self, ctx: &mut RequestContext, _input: StageValue) -> StageResult {
        ctx.ok();
        Ok(Value::Null)
    }
}
