//! Logger collaborator trait and implementations.

use crate::config::LoggerConfig;
use crate::errors::ErrorRecord;
use crate::http::Request;
use http::header::{HeaderMap, AUTHORIZATION};
use serde_json::{Map, Value};
use tracing::{error, info};

/// Replacement for credential values in request logs.
pub const REDACTED: &str = "<redacted>";

/// Body fields never written to request logs.
const SENSITIVE_FIELDS: &[&str] = &["password"];

/// Fire-and-forget logging collaborator.
///
/// Implementations must never panic; every method returns `()`.
pub trait Logger: Send + Sync {
    /// Logs an error with full detail.
    fn exception(&self, err: &ErrorRecord);

    /// Logs an informational message.
    fn info(&self, message: &str, data: Option<Value>);

    /// Logs a lifecycle message.
    fn system(&self, message: &str, data: Option<Value>);

    /// Logs a diagnostic message.
    fn trace(&self, message: &str, data: Option<Value>);

    /// Logs an inbound request.
    fn request(&self, request: &Request);

    /// Logs a data store statement and its values.
    fn query(&self, statement: &str, values: &[Value]);
}

/// A logger that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn exception(&self, _err: &ErrorRecord) {}
    fn info(&self, _message: &str, _data: Option<Value>) {}
    fn system(&self, _message: &str, _data: Option<Value>) {}
    fn trace(&self, _message: &str, _data: Option<Value>) {}
    fn request(&self, _request: &Request) {}
    fn query(&self, _statement: &str, _values: &[Value]) {}
}

/// A logger backed by the `tracing` framework.
///
/// `system` and `trace` output are only emitted when enabled in the
/// [`LoggerConfig`].
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    config: LoggerConfig,
}

impl TracingLogger {
    /// Creates a tracing logger with the given settings.
    #[must_use]
    pub fn new(config: LoggerConfig) -> Self {
        Self { config }
    }

    /// Returns the logger settings.
    #[must_use]
    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }
}

impl Logger for TracingLogger {
    fn exception(&self, err: &ErrorRecord) {
        error!(
            error_kind = %err.kind,
            error = %err.to_log_value(),
            "{}", err
        );
    }

    fn info(&self, message: &str, data: Option<Value>) {
        info!(log_type = "info", data = ?data, "{}", message);
    }

    fn system(&self, message: &str, data: Option<Value>) {
        if self.config.system {
            info!(log_type = "system", data = ?data, "{}", message);
        }
    }

    fn trace(&self, message: &str, data: Option<Value>) {
        if self.config.trace {
            info!(log_type = "trace", data = ?data, "{}", message);
        }
    }

    fn request(&self, request: &Request) {
        let body = redact_body(&request.body);
        let headers = redact_headers(&request.headers);
        info!(
            log_type = "request",
            method = %request.method,
            path = %request.path,
            body = %body,
            headers = ?headers,
            "request"
        );
    }

    fn query(&self, statement: &str, values: &[Value]) {
        info!(
            log_type = "query",
            values = ?values,
            "{}", collapse_whitespace(statement)
        );
    }
}

/// Copies a request body with credential fields replaced by [`REDACTED`].
#[must_use]
pub fn redact_body(body: &Map<String, Value>) -> Value {
    let redacted = body
        .iter()
        .map(|(key, value)| {
            if SENSITIVE_FIELDS.contains(&key.as_str()) {
                (key.clone(), Value::from(REDACTED))
            } else {
                (key.clone(), value.clone())
            }
        })
        .collect();
    Value::Object(redacted)
}

/// Renders headers as `name: value` lines with `Authorization` redacted.
#[must_use]
pub fn redact_headers(headers: &HeaderMap) -> Vec<String> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if *name == AUTHORIZATION {
                REDACTED
            } else {
                value.to_str().unwrap_or("<binary>")
            };
            format!("{name}: {value}")
        })
        .collect()
}

/// Collapses runs of two or more whitespace characters into a single space.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    let mut pending: Option<char> = None;

    for c in text.chars() {
        if c.is_whitespace() {
            run += 1;
            if run == 1 {
                pending = Some(c);
            }
            continue;
        }
        match (run, pending.take()) {
            (1, Some(ws)) => out.push(ws),
            (0, _) => {}
            _ => out.push(' '),
        }
        run = 0;
        out.push(c);
    }
    match (run, pending) {
        (1, Some(ws)) => out.push(ws),
        (0, _) => {}
        _ => out.push(' '),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace("SELECT *\n    FROM users\n    WHERE id = ?"),
            "SELECT * FROM users WHERE id = ?"
        );
        assert_eq!(collapse_whitespace("a b"), "a b");
        assert_eq!(collapse_whitespace("a\tb"), "a\tb");
        assert_eq!(collapse_whitespace("trailing  "), "trailing ");
    }

    #[test]
    fn test_request_credentials_are_redacted() {
        let body = serde_json::json!({"user_name": "alice", "password": "hunter2"});
        let redacted = redact_body(body.as_object().unwrap());
        assert_eq!(redacted["user_name"], "alice");
        assert_eq!(redacted["password"], REDACTED);

        let request = Request::default()
            .with_accept("text/csv")
            .with_authorization("Bearer abc.def.ghi");
        let headers = redact_headers(&request.headers);
        assert!(headers.contains(&"accept: text/csv".to_string()));
        assert!(headers.contains(&format!("authorization: {REDACTED}")));
        assert!(headers.iter().all(|line| !line.contains("abc.def.ghi")));
    }

    #[test]
    fn test_tracing_logger_does_not_panic() {
        let logger = TracingLogger::new(LoggerConfig {
            system: true,
            trace: true,
            json: false,
        });
        logger.exception(&ErrorRecord::system("boom"));
        logger.system("Server started", None);
        logger.trace("stage", Some(serde_json::json!({"stage": "extract"})));
        logger.request(&Request::default().with_accept("text/csv"));
        logger.query("SELECT  1", &[serde_json::json!(1)]);
    }

    #[test]
    fn test_noop_logger() {
        let logger = NoOpLogger;
        logger.exception(&ErrorRecord::not_implemented());
        logger.info("ignored", None);
    }
}
