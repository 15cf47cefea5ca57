//! Media types and `Accept` parsing.

use crate::http::{CONTENT_TYPE_CSV, CONTENT_TYPE_JSON, CONTENT_TYPE_TEXT};
use std::fmt;

/// A response representation the responder knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// `application/json`
    Json,
    /// `text/csv`
    Csv,
    /// `text/tabular`, also accepted as `x-text/tabular`
    Tabular,
    /// `text/plain`
    PlainText,
}

impl MediaType {
    /// Every media type, in no particular priority.
    pub const ALL: [Self; 4] = [Self::Json, Self::Csv, Self::Tabular, Self::PlainText];

    /// Matches an `Accept` candidate exactly. Parameters are not stripped.
    #[must_use]
    pub fn parse(candidate: &str) -> Option<Self> {
        match candidate {
            "application/json" => Some(Self::Json),
            "text/csv" => Some(Self::Csv),
            "text/tabular" | "x-text/tabular" => Some(Self::Tabular),
            "text/plain" => Some(Self::PlainText),
            _ => None,
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
            Self::Tabular => "text/tabular",
            Self::PlainText => "text/plain",
        }
    }

    /// Returns the `Content-Type` the representation is delivered as.
    ///
    /// Tabular output is plain text on the wire.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => CONTENT_TYPE_JSON,
            Self::Csv => CONTENT_TYPE_CSV,
            Self::Tabular | Self::PlainText => CONTENT_TYPE_TEXT,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splits an `Accept` header into trimmed candidates in priority order.
///
/// Priority is list order; quality values are not interpreted.
#[must_use]
pub fn parse_accept(header: Option<&str>) -> Vec<&str> {
    header
        .map(|h| h.split(',').map(str::trim).filter(|c| !c.is_empty()).collect())
        .unwrap_or_default()
}
