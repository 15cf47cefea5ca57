//! CSV formatter.

use super::formatter::Formatter;
use super::media::MediaType;
use super::normalize::normalize;
use super::records::{cell_text, conform_records, Column};
use crate::errors::ErrorRecord;
use serde_json::Value;

/// Header line plus one line per record, quoted per RFC 4180.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormatter;

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn write_line<I: IntoIterator<Item = String>>(out: &mut String, fields: I) {
    let line = fields
        .into_iter()
        .map(|f| escape(&f))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&line);
    out.push('\n');
}

impl Formatter for CsvFormatter {
    fn media_type(&self) -> MediaType {
        MediaType::Csv
    }

    fn format(&self, data: &Value, columns: Option<&[Column]>) -> Result<String, ErrorRecord> {
        let (records, columns) = conform_records(&normalize(data), columns)?;

        let mut out = String::new();
        write_line(&mut out, columns.iter().map(|c| c.name.clone()));
        for record in &records {
            write_line(&mut out, columns.iter().map(|c| cell_text(record.get(&c.key))));
        }
        Ok(out)
    }
}
