//! Fixed-width text table formatter.

use super::formatter::Formatter;
use super::media::MediaType;
use super::normalize::normalize;
use super::records::{cell_text, conform_records, Column};
use crate::errors::ErrorRecord;
use serde_json::Value;

/// Renders records as an ASCII table:
///
/// ```text
/// +----+----+
/// | A  | B  |
/// +----+----+
/// | 1  | xy |
/// +----+----+
/// ```
///
/// Each column is as wide as its longest header or cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabularFormatter;

/// Line breaks inside a cell are written as `\n` and `\r` so every row
/// stays on one line.
fn escape_line_breaks(text: &str) -> String {
    if !text.contains(['\n', '\r']) {
        return text.to_string();
    }
    text.replace('\r', "\\r").replace('\n', "\\n")
}

fn width_of(s: &str) -> usize {
    s.chars().count()
}

fn push_bar(out: &mut String, widths: &[usize]) {
    for width in widths {
        out.push('+');
        out.push_str(&"-".repeat(width + 2));
    }
    out.push_str("+\n");
}

fn push_row<'a>(out: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    for (cell, width) in cells.zip(widths) {
        out.push_str("| ");
        out.push_str(cell);
        out.push_str(&" ".repeat(width.saturating_sub(width_of(cell))));
        out.push(' ');
    }
    out.push_str("|\n");
}

impl Formatter for TabularFormatter {
    fn media_type(&self) -> MediaType {
        MediaType::Tabular
    }

    fn format(&self, data: &Value, columns: Option<&[Column]>) -> Result<String, ErrorRecord> {
        let (records, columns) = conform_records(&normalize(data), columns)?;

        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|c| escape_line_breaks(&cell_text(record.get(&c.key))))
                    .collect()
            })
            .collect();
        let names: Vec<String> = columns.iter().map(|c| escape_line_breaks(&c.name)).collect();

        let widths: Vec<usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                rows.iter()
                    .map(|row| width_of(&row[i]))
                    .fold(width_of(name), usize::max)
            })
            .collect();

        let mut out = String::new();
        push_bar(&mut out, &widths);
        push_row(&mut out, &widths, names.iter().map(String::as_str));
        push_bar(&mut out, &widths);
        for row in &rows {
            push_row(&mut out, &widths, row.iter().map(String::as_str));
        }
        push_bar(&mut out, &widths);
        Ok(out)
    }
}
