//! The formatter trait and the JSON and plain-text formatters.

use super::media::MediaType;
use super::normalize::{normalize, stringify};
use super::records::Column;
use crate::errors::ErrorRecord;
use serde_json::Value;
use std::fmt::Debug;

/// Renders response data as one media type.
pub trait Formatter: Send + Sync + Debug {
    /// The media type this formatter produces.
    fn media_type(&self) -> MediaType;

    /// The `Content-Type` the output is delivered as.
    fn content_type(&self) -> &'static str {
        self.media_type().content_type()
    }

    /// Formats `data`, using `columns` where the representation is tabular.
    ///
    /// # Errors
    ///
    /// Returns an error record if the data cannot be represented.
    fn format(&self, data: &Value, columns: Option<&[Column]>) -> Result<String, ErrorRecord>;
}

/// Normalized JSON, optionally pretty-printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    prettify: bool,
}

impl JsonFormatter {
    /// Creates a JSON formatter.
    #[must_use]
    pub fn new(prettify: bool) -> Self {
        Self { prettify }
    }
}

impl Formatter for JsonFormatter {
    fn media_type(&self) -> MediaType {
        MediaType::Json
    }

    fn format(&self, data: &Value, _columns: Option<&[Column]>) -> Result<String, ErrorRecord> {
        stringify(&normalize(data), self.prettify)
    }
}

/// Strings verbatim, anything else as compact JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextFormatter;

impl Formatter for PlainTextFormatter {
    fn media_type(&self) -> MediaType {
        MediaType::PlainText
    }

    fn format(&self, data: &Value, _columns: Option<&[Column]>) -> Result<String, ErrorRecord> {
        match data {
            Value::String(s) => Ok(s.clone()),
            Value::Null => Ok(String::new()),
            other => stringify(other, false),
        }
    }
}
