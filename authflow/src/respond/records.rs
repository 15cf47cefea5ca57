//! Record and column conformance shared by the tabular formatters.

use crate::errors::ErrorRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of tabular output.
pub type Record = Map<String, Value>;

/// A column of tabular output: the record key and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Key looked up in each record.
    pub key: String,
    /// Header text.
    pub name: String,
}

impl Column {
    /// Creates a column whose header is its key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
        }
    }

    /// Creates a column with a distinct header.
    #[must_use]
    pub fn named(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
}

fn unparsable() -> ErrorRecord {
    ErrorRecord::validation("Could not parse data")
}

/// Coerces `data` into records and resolves the columns to render.
///
/// A single object is one record. Without explicit columns, they are taken
/// from the first record's keys in order.
///
/// # Errors
///
/// Returns a `Validation` record when the data is `null`, contains
/// non-object rows, or is empty and no columns were given.
pub fn conform_records(
    data: &Value,
    columns: Option<&[Column]>,
) -> Result<(Vec<Record>, Vec<Column>), ErrorRecord> {
    let records = match data {
        Value::Object(map) => vec![map.clone()],
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_object().cloned().ok_or_else(unparsable))
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err(unparsable()),
    };

    let columns = match columns {
        Some(columns) => columns.to_vec(),
        None => records
            .first()
            .ok_or_else(unparsable)?
            .keys()
            .map(Column::new)
            .collect(),
    };

    Ok((records, columns))
}

/// Renders a cell. Missing and `null` values are empty; strings are
/// verbatim; anything else is its JSON text.
#[must_use]
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
