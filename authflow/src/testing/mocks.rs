//! Mock stages and collaborators for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::time::Duration;

use crate::context::RequestContext;
use crate::errors::ErrorRecord;
use crate::http::Request;
use crate::observability::{collapse_whitespace, Logger};
use crate::pipeline::{Stage, StageResult, StageValue};

/// A stage that records its inputs and returns a configurable output.
///
/// Without an output set, the input is passed through.
#[derive(Debug)]
pub struct RecordingStage {
    name: String,
    output: Mutex<Option<Value>>,
    inputs: Mutex<Vec<Value>>,
}

impl RecordingStage {
    /// Creates a pass-through recording stage.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            output: Mutex::new(None),
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// Creates a recording stage that always returns `output`.
    #[must_use]
    pub fn returning(name: impl Into<String>, output: Value) -> Self {
        let stage = Self::new(name);
        *stage.output.lock() = Some(output);
        stage
    }

    /// Returns the stage name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of runs.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.inputs.lock().len()
    }

    /// Returns the inputs of every run.
    #[must_use]
    pub fn inputs(&self) -> Vec<Value> {
        self.inputs.lock().clone()
    }
}

#[async_trait]
impl Stage for RecordingStage {
    async fn run(&self, _ctx: &mut RequestContext, input: StageValue) -> StageResult {
        self.inputs.lock().push(input.clone());
        Ok(self.output.lock().clone().unwrap_or(input))
    }
}

/// A stage that always fails with a fixed error.
#[derive(Debug, Clone)]
pub struct FailingStage {
    error: ErrorRecord,
}

impl FailingStage {
    /// Creates a stage failing with `error`.
    #[must_use]
    pub fn new(error: ErrorRecord) -> Self {
        Self { error }
    }
}

#[async_trait]
impl Stage for FailingStage {
    async fn run(&self, _ctx: &mut RequestContext, _input: StageValue) -> StageResult {
        Err(self.error.clone())
    }
}

/// A pass-through stage that sleeps first.
#[derive(Debug, Clone)]
pub struct SlowStage {
    delay: Duration,
}

impl SlowStage {
    /// Creates a stage sleeping for `delay`.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Stage for SlowStage {
    async fn run(&self, _ctx: &mut RequestContext, input: StageValue) -> StageResult {
        tokio::time::sleep(self.delay).await;
        Ok(input)
    }
}

/// A logger that keeps everything it is given.
#[derive(Debug, Default)]
pub struct CollectingLogger {
    exceptions: Mutex<Vec<ErrorRecord>>,
    messages: Mutex<Vec<String>>,
    queries: Mutex<Vec<String>>,
    requests: Mutex<Vec<String>>,
}

impl CollectingLogger {
    /// Creates an empty collecting logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every logged exception.
    #[must_use]
    pub fn exceptions(&self) -> Vec<ErrorRecord> {
        self.exceptions.lock().clone()
    }

    /// Returns every info, system, and trace message.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Returns every logged statement, whitespace collapsed.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }

    /// Returns the paths of every logged request.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl Logger for CollectingLogger {
    fn exception(&self, err: &ErrorRecord) {
        self.exceptions.lock().push(err.clone());
    }

    fn info(&self, message: &str, _data: Option<Value>) {
        self.messages.lock().push(message.to_string());
    }

    fn system(&self, message: &str, _data: Option<Value>) {
        self.messages.lock().push(message.to_string());
    }

    fn trace(&self, message: &str, _data: Option<Value>) {
        self.messages.lock().push(message.to_string());
    }

    fn request(&self, request: &Request) {
        self.requests.lock().push(request.path.clone());
    }

    fn query(&self, statement: &str, _values: &[Value]) {
        self.queries.lock().push(collapse_whitespace(statement));
    }
}
