//! Sequential pipeline execution.

use super::definition::{PipelineDefinition, StageKey};
use super::stage::StageValue;
use crate::context::RequestContext;
use crate::errors::ErrorRecord;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, warn};

/// Where an execution is, or where it stopped.
///
/// Indices are positions in the pipeline's stage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "stage", rename_all = "snake_case")]
pub enum ExecutionState {
    /// No stage has started.
    Pending,
    /// Stage `i` is running.
    Running(usize),
    /// Every stage succeeded.
    Completed,
    /// Stage `i` failed; later stages did not run.
    Failed(usize),
    /// Cancellation was observed before stage `i` started.
    Cancelled(usize),
}

impl ExecutionState {
    /// Returns true for `Completed`, `Failed`, and `Cancelled`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_) | Self::Cancelled(_))
    }
}

/// The outcome of one execution.
#[derive(Debug, Clone)]
pub struct ExecutionReport<K> {
    /// Pipeline name.
    pub pipeline: String,
    /// Final state.
    pub state: ExecutionState,
    /// Stages that started, in order.
    pub executed: Vec<K>,
    /// The last stage's output when completed.
    pub output: Option<StageValue>,
    /// The error that stopped a failed execution.
    pub error: Option<ErrorRecord>,
    /// Wall time in milliseconds.
    pub duration_ms: f64,
}

impl<K> ExecutionReport<K> {
    /// Returns true if every stage succeeded.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == ExecutionState::Completed
    }

    /// Returns true if a stage failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.state, ExecutionState::Failed(_))
    }

    /// Returns true if the execution was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self.state, ExecutionState::Cancelled(_))
    }

    /// Returns how many stages started.
    #[must_use]
    pub fn stages_run(&self) -> usize {
        self.executed.len()
    }
}

impl<K: StageKey> PipelineDefinition<K> {
    /// Runs the stages in order, feeding each output to the next stage.
    ///
    /// The first failure stops the execution and is written through the
    /// responder's error path. Success writes nothing; responding is the
    /// last stage's job. Cancellation is checked before every stage, and a
    /// cancelled execution writes nothing.
    pub async fn execute(&self, ctx: &mut RequestContext, input: StageValue) -> ExecutionReport<K> {
        let start = Instant::now();
        let mut report = ExecutionReport {
            pipeline: self.name().to_string(),
            state: ExecutionState::Pending,
            executed: Vec::with_capacity(self.slots.len()),
            output: None,
            error: None,
            duration_ms: 0.0,
        };
        let mut value = input;

        for (index, slot) in self.slots.iter().enumerate() {
            if ctx.is_cancelled() {
                debug!(
                    pipeline = %report.pipeline,
                    request_id = %ctx.id(),
                    stage = %slot.key,
                    reason = ?ctx.cancellation().reason(),
                    "Execution cancelled"
                );
                report.state = ExecutionState::Cancelled(index);
                return finish(report, start);
            }

            report.state = ExecutionState::Running(index);
            report.executed.push(slot.key);
            let stage = slot.stage.read().clone();

            debug!(pipeline = %report.pipeline, stage = %slot.key, index, "Running stage");

            match stage.run(ctx, value).await {
                Ok(output) => value = output,
                Err(err) => {
                    warn!(
                        pipeline = %report.pipeline,
                        request_id = %ctx.id(),
                        stage = %slot.key,
                        error_kind = %err.kind,
                        "Stage failed"
                    );
                    ctx.fail(&err);
                    report.state = ExecutionState::Failed(index);
                    report.error = Some(err);
                    return finish(report, start);
                }
            }
        }

        report.state = ExecutionState::Completed;
        report.output = Some(value);
        finish(report, start)
    }
}

fn finish<K>(mut report: ExecutionReport<K>, start: Instant) -> ExecutionReport<K> {
    report.duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    debug!(
        pipeline = %report.pipeline,
        state = ?report.state,
        duration_ms = report.duration_ms,
        "Execution finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CancellationToken;
    use crate::errors::ErrorKind;
    use crate::pipeline::stage_fn;
    use crate::testing::{test_context, FailingStage, RecordingStage, TestRequest};
    use http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    crate::stage_keys! {
        enum Step {
            A => "a",
            B => "b",
            C => "c",
            D => "d",
        }
    }

    fn recording_pipeline(
        fail_at: Option<usize>,
    ) -> (PipelineDefinition<Step>, Vec<Arc<RecordingStage>>) {
        let recorders: Vec<_> = Step::ALL
            .iter()
            .map(|k| Arc::new(RecordingStage::new(k.as_str())))
            .collect();
        let stages = Step::ALL.iter().enumerate().map(|(i, key)| {
            let stage: Arc<dyn crate::pipeline::Stage> = if Some(i) == fail_at {
                Arc::new(FailingStage::new(ErrorRecord::validation("bad input")))
            } else {
                recorders[i].clone()
            };
            (*key, stage)
        });
        (PipelineDefinition::define("test", stages).unwrap(), recorders)
    }

    #[tokio::test]
    async fn test_completes_in_order() {
        let (pipeline, recorders) = recording_pipeline(None);
        let mut ctx = test_context(TestRequest::post("/").build());

        let report = pipeline.execute(&mut ctx, json!(0)).await;

        assert!(report.is_completed());
        assert_eq!(report.executed, Step::ALL.to_vec());
        assert!(recorders.iter().all(|r| r.calls() == 1));
        assert!(!ctx.has_responded());
    }

    #[tokio::test]
    async fn test_failure_at_k_runs_k_plus_one_stages() {
        for k in 0..Step::ALL.len() {
            let (pipeline, recorders) = recording_pipeline(Some(k));
            let mut ctx = test_context(TestRequest::post("/").build());

            let report = pipeline.execute(&mut ctx, json!(0)).await;

            assert_eq!(report.state, ExecutionState::Failed(k));
            assert_eq!(report.stages_run(), k + 1);
            assert!(recorders[k + 1..].iter().all(|r| r.calls() == 0));
            assert!(report.error.as_ref().unwrap().is(ErrorKind::Validation));

            let response = ctx.response().unwrap();
            assert_eq!(response.status, StatusCode::BAD_REQUEST);
            assert_eq!(response.body_text(), "bad input");
        }
    }

    #[tokio::test]
    async fn test_outputs_thread_through() {
        let pipeline = PipelineDefinition::builder("sum")
            .stage(Step::A, stage_fn("inc", |_, v| Ok(json!(v.as_i64().unwrap_or_default() + 1))))
            .stage(Step::B, stage_fn("dbl", |_, v| Ok(json!(v.as_i64().unwrap_or_default() * 2))))
            .build()
            .unwrap();
        let mut ctx = test_context(TestRequest::post("/").build());

        let report = pipeline.execute(&mut ctx, json!(4)).await;
        assert_eq!(report.output, Some(json!(10)));
    }

    #[tokio::test]
    async fn test_cancelled_before_first_stage() {
        let (pipeline, recorders) = recording_pipeline(None);
        let token = Arc::new(CancellationToken::new());
        token.cancel("client went away");
        let mut ctx = test_context(TestRequest::post("/").build()).with_cancellation(token);

        let report = pipeline.execute(&mut ctx, json!(0)).await;

        assert_eq!(report.state, ExecutionState::Cancelled(0));
        assert!(recorders.iter().all(|r| r.calls() == 0));
        assert!(!ctx.has_responded());
    }

    #[tokio::test]
    async fn test_cancelled_mid_execution() {
        let pipeline = PipelineDefinition::builder("cancel")
            .stage(Step::A, stage_fn("cancel", |ctx, v| {
                ctx.cancellation().cancel("disconnect");
                Ok(v)
            }))
            .stage(Step::B, stage_fn("never", |_, _| Err(ErrorRecord::system("ran"))))
            .build()
            .unwrap();
        let mut ctx = test_context(TestRequest::post("/").build());

        let report = pipeline.execute(&mut ctx, json!(0)).await;

        assert_eq!(report.state, ExecutionState::Cancelled(1));
        assert_eq!(report.executed, vec![Step::A]);
        assert!(!ctx.has_responded());
    }
}
