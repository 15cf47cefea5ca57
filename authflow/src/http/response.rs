//! Outbound response value.

use http::header::{HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};

/// Content type for JSON bodies.
pub const CONTENT_TYPE_JSON: &str = "application/json";
/// Content type for CSV bodies.
pub const CONTENT_TYPE_CSV: &str = "text/csv";
/// Content type for plain-text and tabular bodies.
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

/// A response produced by the responder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Body text, if any.
    pub body: Option<String>,
}

impl Response {
    /// Creates an empty response with the given status.
    #[must_use]
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Creates a successful response with a typed body.
    #[must_use]
    pub fn with_content(content_type: &'static str, body: String) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        Self {
            status: StatusCode::OK,
            headers,
            body: Some(body),
        }
    }

    /// Creates a response with a status and an optional untyped message body.
    #[must_use]
    pub fn with_message(status: StatusCode, message: Option<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: message,
        }
    }

    /// Returns the `Content-Type` header, if set.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Returns the body text, or an empty string.
    #[must_use]
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is missing or not valid JSON.
    pub fn body_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(self.body_text())
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_content_sets_type() {
        let response = Response::with_content(CONTENT_TYPE_JSON, "{}".to_string());
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.content_type(), Some(CONTENT_TYPE_JSON));
        assert!(response.is_success());
    }

    #[test]
    fn test_empty_has_no_body() {
        let response = Response::empty(StatusCode::NOT_IMPLEMENTED);
        assert!(response.body.is_none());
        assert_eq!(response.body_text(), "");
        assert!(response.content_type().is_none());
    }
}
