//! The responder: negotiation, formatting, and error responses.

use super::csv::CsvFormatter;
use super::formatter::{Formatter, JsonFormatter, PlainTextFormatter};
use super::media::{parse_accept, MediaType};
use super::records::Column;
use super::tabular::TabularFormatter;
use crate::classify::ErrorClassifier;
use crate::config::ServerConfig;
use crate::errors::ErrorRecord;
use crate::http::{Request, Response};
use crate::observability::Logger;
use http::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Content type for raw HTML bodies.
const CONTENT_TYPE_HTML: &str = "text/html";

/// Writes responses in the representation the client asked for.
///
/// Holds the registered formatters and the error classifier. Shared by all
/// pipelines of an application and never mutated after construction.
#[derive(Debug, Clone)]
pub struct Responder {
    formatters: Vec<Arc<dyn Formatter>>,
    classifier: ErrorClassifier,
    prettify: bool,
}

impl Responder {
    /// Creates a responder with the four built-in formatters.
    #[must_use]
    pub fn new(config: &ServerConfig, logger: Arc<dyn Logger>) -> Self {
        Self::bare(config, logger)
            .with_formatter(JsonFormatter::new(config.prettify_json))
            .with_formatter(CsvFormatter)
            .with_formatter(TabularFormatter)
            .with_formatter(PlainTextFormatter)
    }

    /// Creates a responder with no formatters registered.
    #[must_use]
    pub fn bare(config: &ServerConfig, logger: Arc<dyn Logger>) -> Self {
        Self {
            formatters: Vec::new(),
            classifier: ErrorClassifier::new(logger),
            prettify: config.prettify_json,
        }
    }

    /// Registers a formatter, replacing any for the same media type.
    #[must_use]
    pub fn with_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        let media = formatter.media_type();
        self.formatters.retain(|f| f.media_type() != media);
        self.formatters.push(Arc::new(formatter));
        self
    }

    /// Unregisters the formatter for `media`.
    #[must_use]
    pub fn without_formatter(mut self, media: MediaType) -> Self {
        self.formatters.retain(|f| f.media_type() != media);
        self
    }

    /// Returns the formatter registered for `media`.
    #[must_use]
    pub fn formatter(&self, media: MediaType) -> Option<&Arc<dyn Formatter>> {
        self.formatters.iter().find(|f| f.media_type() == media)
    }

    /// Returns the error classifier.
    #[must_use]
    pub fn classifier(&self) -> &ErrorClassifier {
        &self.classifier
    }

    /// Picks the representation for `request`.
    ///
    /// The first `Accept` candidate with a registered formatter wins, then
    /// JSON if registered. `None` means nothing can be produced.
    #[must_use]
    pub fn negotiate(&self, request: &Request) -> Option<MediaType> {
        let accept = request.accept();
        parse_accept(accept.as_deref())
            .into_iter()
            .filter_map(MediaType::parse)
            .chain(std::iter::once(MediaType::Json))
            .find(|media| self.formatter(*media).is_some())
    }

    /// Negotiates and writes `data`.
    #[must_use]
    pub fn respond(&self, request: &Request, data: &Value) -> Response {
        self.respond_with(request, data, None)
    }

    /// Negotiates and writes `data` with explicit columns for tabular output.
    ///
    /// Falls back to an empty `200` when no formatter applies. Formatting
    /// failures become classified error responses.
    #[must_use]
    pub fn respond_with(
        &self,
        request: &Request,
        data: &Value,
        columns: Option<&[Column]>,
    ) -> Response {
        match self.negotiate(request) {
            Some(media) => {
                debug!(media_type = %media, "Negotiated response representation");
                self.render(media, data, columns)
            }
            None => self.ok(),
        }
    }

    /// Writes `data` as JSON.
    #[must_use]
    pub fn json(&self, data: &Value) -> Response {
        self.render(MediaType::Json, data, None)
    }

    /// Writes `data` as CSV.
    #[must_use]
    pub fn csv(&self, data: &Value, columns: Option<&[Column]>) -> Response {
        self.render(MediaType::Csv, data, columns)
    }

    /// Writes `data` as a text table.
    #[must_use]
    pub fn tabular(&self, data: &Value, columns: Option<&[Column]>) -> Response {
        self.render(MediaType::Tabular, data, columns)
    }

    /// Writes `data` as plain text.
    #[must_use]
    pub fn plain_text(&self, data: &Value) -> Response {
        self.render(MediaType::PlainText, data, None)
    }

    /// Writes a body with no content type.
    #[must_use]
    pub fn text(&self, body: impl Into<String>) -> Response {
        Response::with_message(StatusCode::OK, Some(body.into()))
    }

    /// Writes an HTML body.
    #[must_use]
    pub fn html(&self, body: impl Into<String>) -> Response {
        Response::with_content(CONTENT_TYPE_HTML, body.into())
    }

    /// An empty `200`.
    #[must_use]
    pub fn ok(&self) -> Response {
        Response::empty(StatusCode::OK)
    }

    /// A `404` with an optional message.
    #[must_use]
    pub fn not_found(&self, message: Option<String>) -> Response {
        Response::with_message(StatusCode::NOT_FOUND, message)
    }

    /// A `400` with an optional message.
    ///
    /// The classifier maps `NotAllowed` records to `401`; this direct
    /// helper answers `400`.
    #[must_use]
    pub fn not_allowed(&self, message: Option<String>) -> Response {
        Response::with_message(StatusCode::BAD_REQUEST, message)
    }

    /// A `400` with an optional message.
    #[must_use]
    pub fn bad_request(&self, message: Option<String>) -> Response {
        Response::with_message(StatusCode::BAD_REQUEST, message)
    }

    /// A `401` with an optional message.
    #[must_use]
    pub fn unauthorized(&self, message: Option<String>) -> Response {
        Response::with_message(StatusCode::UNAUTHORIZED, message)
    }

    /// A `501` with an optional message.
    #[must_use]
    pub fn not_implemented(&self, message: Option<String>) -> Response {
        Response::with_message(StatusCode::NOT_IMPLEMENTED, message)
    }

    /// Logs `err` and answers an empty `500`, skipping classification.
    #[must_use]
    pub fn failure(&self, err: &ErrorRecord) -> Response {
        self.classifier.logger().exception(err);
        Response::empty(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Logs and classifies `err` into a response.
    #[must_use]
    pub fn error(&self, err: &ErrorRecord) -> Response {
        self.classifier.handle(err).into_response()
    }

    fn render(&self, media: MediaType, data: &Value, columns: Option<&[Column]>) -> Response {
        let result = match self.formatter(media) {
            Some(formatter) => formatter
                .format(data, columns)
                .map(|body| Response::with_content(formatter.content_type(), body)),
            None => self.builtin(media, data, columns),
        };
        result.unwrap_or_else(|err| self.error(&err))
    }

    fn builtin(
        &self,
        media: MediaType,
        data: &Value,
        columns: Option<&[Column]>,
    ) -> Result<Response, ErrorRecord> {
        let formatter: Box<dyn Formatter> = match media {
            MediaType::Json => Box::new(JsonFormatter::new(self.prettify)),
            MediaType::Csv => Box::new(CsvFormatter),
            MediaType::Tabular => Box::new(TabularFormatter),
            MediaType::PlainText => Box::new(PlainTextFormatter),
        };
        let body = formatter.format(data, columns)?;
        Ok(Response::with_content(formatter.content_type(), body))
    }
}
