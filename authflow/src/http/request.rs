//! Inbound request view.

use http::header::{HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use http::{HeaderMap, Method};
use serde_json::{Map, Value};

/// An inbound operation request.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// The request method.
    pub method: Method,
    /// The request path.
    pub path: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Parsed body fields.
    pub body: Map<String, Value>,
}

impl Request {
    /// Creates a request with the given method and path.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: Map::new(),
        }
    }

    /// Adds a header. Invalid names or values are ignored.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the `Accept` header.
    #[must_use]
    pub fn with_accept(self, accept: &str) -> Self {
        self.with_header(ACCEPT.as_str(), accept)
    }

    /// Sets the `Authorization` header.
    #[must_use]
    pub fn with_authorization(self, credential: &str) -> Self {
        self.with_header(AUTHORIZATION.as_str(), credential)
    }

    /// Sets a body field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    /// Replaces the body with the fields of a JSON object.
    ///
    /// Non-object values leave the body empty.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = match body {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self
    }

    /// Returns a header value as text, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns every `Accept` header value joined with `,` in arrival order,
    /// if any.
    #[must_use]
    pub fn accept(&self) -> Option<String> {
        let values: Vec<&str> = self
            .headers
            .get_all(ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        (!values.is_empty()).then(|| values.join(","))
    }

    /// Returns the raw `Authorization` header, if any.
    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.header(AUTHORIZATION.as_str())
    }

    /// Returns a body field as trimmed text, or an empty string when missing.
    #[must_use]
    pub fn text_field(&self, key: &str) -> String {
        match self.body.get(key) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string().trim().to_string(),
        }
    }
}
