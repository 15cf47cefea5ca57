//! Testing utilities for authflow pipelines.
//!
//! This module provides:
//! - Mock stages and a collecting logger
//! - Request and collaborator fixtures
//! - Response assertions

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_empty, assert_json, assert_message, assert_status};
pub use fixtures::{test_collaborators, test_context, TestFixture, TestRequest};
pub use mocks::{CollectingLogger, FailingStage, RecordingStage, SlowStage};
