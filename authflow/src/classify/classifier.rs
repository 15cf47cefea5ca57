//! Kind-to-status classifier.

use crate::errors::{ErrorKind, ErrorRecord};
use crate::http::Response;
use crate::observability::Logger;
use http::StatusCode;
use std::sync::Arc;

/// The outcome of classifying an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The status code to send.
    pub status: StatusCode,
    /// The message to send, if any.
    pub message: Option<String>,
}

impl Classification {
    fn bare(status: StatusCode) -> Self {
        Self {
            status,
            message: None,
        }
    }

    fn with(status: StatusCode, message: Option<String>) -> Self {
        Self { status, message }
    }

    /// Converts into a response.
    #[must_use]
    pub fn into_response(self) -> Response {
        Response::with_message(self.status, self.message)
    }
}

/// Classifies an error record. Pure: no logging, no state.
///
/// Unrecognized kinds map to 500 with no message so internals never leak.
#[must_use]
pub fn classify(err: &ErrorRecord) -> Classification {
    match err.kind {
        ErrorKind::NotFound => Classification::with(StatusCode::NOT_FOUND, message_with_id(err)),
        ErrorKind::Duplicate => Classification::with(StatusCode::BAD_REQUEST, message_with_id(err)),
        ErrorKind::NotAllowed => {
            Classification::with(StatusCode::UNAUTHORIZED, err.message.clone())
        }
        ErrorKind::NotImplemented => Classification::bare(StatusCode::NOT_IMPLEMENTED),
        ErrorKind::Validation | ErrorKind::File | ErrorKind::Image => {
            Classification::with(StatusCode::BAD_REQUEST, err.message.clone())
        }
        ErrorKind::Http | ErrorKind::Database => Classification::bare(StatusCode::BAD_REQUEST),
        ErrorKind::Authentication => Classification::bare(StatusCode::UNAUTHORIZED),
        ErrorKind::Configuration | ErrorKind::System | ErrorKind::Unknown => {
            Classification::bare(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn message_with_id(err: &ErrorRecord) -> Option<String> {
    match (&err.message, &err.id) {
        (Some(message), Some(id)) => Some(format!("{message} ({id})")),
        (Some(message), None) => Some(message.clone()),
        (None, Some(id)) => Some(id.clone()),
        (None, None) => None,
    }
}

/// Classifier with its logging side effect.
#[derive(Clone)]
pub struct ErrorClassifier {
    logger: Arc<dyn Logger>,
}

impl std::fmt::Debug for ErrorClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorClassifier").finish_non_exhaustive()
    }
}

impl ErrorClassifier {
    /// Creates a classifier that logs through `logger`.
    #[must_use]
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }

    /// Logs the error unconditionally, then classifies it.
    #[must_use]
    pub fn handle(&self, err: &ErrorRecord) -> Classification {
        self.logger.exception(err);
        classify(err)
    }

    /// Returns the logger.
    #[must_use]
    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }
}
