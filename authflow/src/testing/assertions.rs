//! Response assertions.

use crate::http::Response;
use http::StatusCode;
use serde_json::Value;

/// Asserts the response status.
///
/// # Panics
///
/// Panics if the status differs.
pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(
        response.status,
        expected,
        "unexpected status; body: {:?}",
        response.body
    );
}

/// Asserts a `200` JSON response and returns the parsed body.
///
/// # Panics
///
/// Panics if the response is not a successful JSON response.
pub fn assert_json(response: &Response) -> Value {
    assert_status(response, StatusCode::OK);
    assert_eq!(response.content_type(), Some(crate::http::CONTENT_TYPE_JSON));
    match response.body_json() {
        Ok(value) => value,
        Err(e) => panic!("body is not JSON: {e}"),
    }
}

/// Asserts the status and the exact body text.
///
/// # Panics
///
/// Panics if either differs.
pub fn assert_message(response: &Response, status: StatusCode, message: &str) {
    assert_status(response, status);
    assert_eq!(response.body_text(), message);
}

/// Asserts the status and that there is no body.
///
/// # Panics
///
/// Panics if either differs.
pub fn assert_empty(response: &Response, status: StatusCode) {
    assert_status(response, status);
    assert!(response.body.is_none(), "expected no body, got {:?}", response.body);
}
