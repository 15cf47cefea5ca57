//! Error classification.
//!
//! Maps every [`ErrorKind`](crate::errors::ErrorKind) to exactly one status
//! code and decides whether the message is safe to send.

mod classifier;

pub use classifier::{classify, Classification, ErrorClassifier};
