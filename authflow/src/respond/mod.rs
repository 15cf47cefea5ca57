//! Content negotiation and response writing.
//!
//! The [`Responder`] picks a [`Formatter`] from the client's ordered
//! `Accept` list (first match wins, no quality weighting), falls back to
//! JSON, and routes every failure through the error classifier.

mod csv;
mod formatter;
mod media;
mod normalize;
mod records;
mod responder;
mod tabular;

pub use self::csv::CsvFormatter;
pub use formatter::{Formatter, JsonFormatter, PlainTextFormatter};
pub use media::{parse_accept, MediaType};
pub use normalize::{normalize, stringify, TIMESTAMP_FORMAT};
pub use records::{cell_text, conform_records, Column, Record};
pub use responder::Responder;
pub use tabular::TabularFormatter;
