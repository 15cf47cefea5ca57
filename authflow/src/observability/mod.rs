//! Logging for authflow.
//!
//! The [`Logger`] trait is the collaborator that stages, the classifier and
//! the data store report through. [`TracingLogger`] routes it into the
//! `tracing` ecosystem; [`init_tracing`] installs a subscriber.

mod logger;
mod subscriber;

pub use logger::{
    collapse_whitespace, redact_body, redact_headers, Logger, NoOpLogger, TracingLogger, REDACTED,
};
pub use subscriber::init_tracing;
