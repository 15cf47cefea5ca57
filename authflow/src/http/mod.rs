//! Logical request and response values.
//!
//! These carry only what the pipelines consume and produce: method, headers,
//! body fields in, status, headers and body out. Wire framing belongs to the
//! surrounding server.

mod request;
mod response;

pub use request::Request;
pub use response::{Response, CONTENT_TYPE_CSV, CONTENT_TYPE_JSON, CONTENT_TYPE_TEXT};
