//! Error types for the authflow framework.
//!
//! Request-time failures are [`ErrorRecord`]s: a tagged [`ErrorKind`] plus an
//! optional message and identifier. Stages return them, the executor hands
//! them to the responder, and the classifier turns them into a status code.
//! Setup-time mistakes are [`ConfigurationError`]s and never reach a response.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The closed set of error kinds understood by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A requested record does not exist.
    NotFound,
    /// A uniqueness constraint was violated.
    Duplicate,
    /// The caller is not allowed to perform the operation.
    NotAllowed,
    /// A stage was intentionally left for the integrator to supply.
    NotImplemented,
    /// Input failed a format check.
    Validation,
    /// A file could not be read or written.
    File,
    /// An image could not be processed.
    Image,
    /// An outbound HTTP call failed.
    Http,
    /// A database statement failed.
    Database,
    /// A credential or session token was missing, malformed, forged, or expired.
    Authentication,
    /// A setup-time configuration mistake.
    Configuration,
    /// An unexpected internal failure.
    System,
    /// Anything the classifier does not recognize.
    Unknown,
}

impl ErrorKind {
    /// Returns the canonical error name, e.g. `NotFoundError`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFoundError",
            Self::Duplicate => "DuplicateError",
            Self::NotAllowed => "NotAllowedError",
            Self::NotImplemented => "NotImplementedError",
            Self::Validation => "ValidationError",
            Self::File => "FileError",
            Self::Image => "ImageError",
            Self::Http => "HttpError",
            Self::Database => "DatabaseError",
            Self::Authentication => "AuthenticationError",
            Self::Configuration => "ConfigurationError",
            Self::System => "SystemError",
            Self::Unknown => "Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure produced by a stage, a collaborator, or a formatter.
///
/// Each record is consumed exactly once by the error classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// The error kind.
    pub kind: ErrorKind,
    /// Optional human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Optional identifier of the record involved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Additional diagnostic details. Logged, never sent to clients.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub info: serde_json::Map<String, serde_json::Value>,
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(ref message) = self.message {
            write!(f, ": {message}")?;
        }
        if let Some(ref id) = self.id {
            write!(f, " ({id})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorRecord {}

impl ErrorRecord {
    /// Creates a record of the given kind with no message.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            id: None,
            info: serde_json::Map::new(),
        }
    }

    /// Creates a not-found record.
    #[must_use]
    pub fn not_found(message: impl Into<String>, id: impl ToString) -> Self {
        Self::new(ErrorKind::NotFound)
            .with_message(message)
            .with_id(id)
    }

    /// Creates a duplicate record.
    #[must_use]
    pub fn duplicate(message: impl Into<String>, id: impl ToString) -> Self {
        Self::new(ErrorKind::Duplicate)
            .with_message(message)
            .with_id(id)
    }

    /// Creates a not-allowed record.
    #[must_use]
    pub fn not_allowed() -> Self {
        Self::new(ErrorKind::NotAllowed)
    }

    /// Creates a not-implemented record.
    #[must_use]
    pub fn not_implemented() -> Self {
        Self::new(ErrorKind::NotImplemented)
    }

    /// Creates a validation record.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation).with_message(message)
    }

    /// Creates a file record.
    #[must_use]
    pub fn file(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::File).with_message(message)
    }

    /// Creates an image record.
    #[must_use]
    pub fn image(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Image).with_message(message)
    }

    /// Creates an HTTP record for a failed outbound call.
    #[must_use]
    pub fn http(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(ErrorKind::Http)
            .with_message(message)
            .with_info("url", serde_json::Value::String(url.into()))
    }

    /// Creates a database record for a failed statement.
    #[must_use]
    pub fn database(query: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database).with_info("query", serde_json::Value::String(query.into()))
    }

    /// Creates an authentication record.
    ///
    /// The reason is kept in `info` so it is logged but never sent.
    #[must_use]
    pub fn authentication(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication)
            .with_info("reason", serde_json::Value::String(reason.into()))
    }

    /// Creates a system record.
    #[must_use]
    pub fn system(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::System).with_message(message)
    }

    /// Sets the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Adds a diagnostic detail.
    #[must_use]
    pub fn with_info(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.info.insert(key.into(), value);
        self
    }

    /// Returns true if the record has the given kind.
    #[must_use]
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Converts to a JSON representation suitable for logging.
    #[must_use]
    pub fn to_log_value(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("name".to_string(), serde_json::json!(self.kind.as_str()));
        if let Some(ref message) = self.message {
            map.insert("message".to_string(), serde_json::json!(message));
        }
        if let Some(ref id) = self.id {
            map.insert("id".to_string(), serde_json::json!(id));
        }
        if !self.info.is_empty() {
            map.insert("info".to_string(), serde_json::Value::Object(self.info.clone()));
        }
        serde_json::Value::Object(map)
    }
}

impl From<serde_json::Error> for ErrorRecord {
    fn from(err: serde_json::Error) -> Self {
        Self::system(format!("Serialization error: {err}"))
    }
}

/// Setup-time configuration mistakes.
///
/// These are raised while pipelines and services are being built, before
/// any request is served.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// An override named a stage that the pipeline does not define.
    #[error("Action not supported: stage '{stage}' is not defined by pipeline '{pipeline}'")]
    UnknownStage {
        /// The pipeline name.
        pipeline: String,
        /// The requested stage name.
        stage: String,
    },

    /// A definition listed the same stage twice.
    #[error("Stage '{stage}' is defined more than once in pipeline '{pipeline}'")]
    DuplicateStage {
        /// The pipeline name.
        pipeline: String,
        /// The repeated stage name.
        stage: String,
    },

    /// A definition had no stages.
    #[error("Pipeline '{0}' has no stages")]
    EmptyPipeline(String),

    /// The token signing secret was empty.
    #[error("A signing secret is required")]
    MissingSecret,

    /// A validation pattern did not compile.
    #[error("Invalid pattern for {field}: {reason}")]
    InvalidPattern {
        /// The configuration field.
        field: String,
        /// The compiler's message.
        reason: String,
    },

    /// A handler was requested by a name the factory does not know.
    #[error("Handler {0} undefined")]
    UnknownHandler(String),
}

impl From<ConfigurationError> for ErrorRecord {
    fn from(err: ConfigurationError) -> Self {
        Self::new(ErrorKind::Configuration).with_message(err.to_string())
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration text was not valid JSON for the expected shape.
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The source was neither JSON text nor a `.json` file path.
    #[error("Unrecognized configuration format: {0}")]
    Unrecognized(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_record_display() {
        let err = ErrorRecord::not_found("Account not found", 42);
        assert_eq!(err.to_string(), "NotFoundError: Account not found (42)");

        let err = ErrorRecord::not_implemented();
        assert_eq!(err.to_string(), "NotImplementedError");
    }

    #[test]
    fn test_authentication_reason_is_info_only() {
        let err = ErrorRecord::authentication("signature mismatch");
        assert!(err.message.is_none());
        assert_eq!(err.info.get("reason").unwrap(), "signature mismatch");
    }

    #[test]
    fn test_to_log_value() {
        let err = ErrorRecord::duplicate("User exists", "alice")
            .with_info("table", serde_json::json!("users"));
        let value = err.to_log_value();

        assert_eq!(value["name"], "DuplicateError");
        assert_eq!(value["message"], "User exists");
        assert_eq!(value["id"], "alice");
        assert_eq!(value["info"]["table"], "users");
    }

    #[test]
    fn test_configuration_error_converts_to_record() {
        let err = ConfigurationError::UnknownStage {
            pipeline: "login".to_string(),
            stage: "bogus".to_string(),
        };
        let record: ErrorRecord = err.into();

        assert!(record.is(ErrorKind::Configuration));
        assert!(record.message.unwrap().contains("bogus"));
    }

    #[test]
    fn test_error_record_serialization() {
        let err = ErrorRecord::validation("Invalid password");
        let json = serde_json::to_string(&err).unwrap();
        let back: ErrorRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
