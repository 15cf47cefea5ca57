//! JSON normalization applied before formatting.

use crate::errors::ErrorRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Fixed format for timestamps in response bodies.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Indent used for pretty-printed JSON.
const PRETTY_INDENT: &[u8] = b"   ";

/// Returns a normalized copy of `value`.
///
/// * strings that parse as JSON are replaced by their parsed, normalized value
/// * RFC 3339 timestamp strings are rendered as [`TIMESTAMP_FORMAT`] in UTC
/// * arrays and objects are normalized element by element
#[must_use]
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), normalize(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::String(s) => normalize_string(s),
        other => other.clone(),
    }
}

fn normalize_string(s: &str) -> Value {
    if let Ok(parsed) = serde_json::from_str::<Value>(s) {
        return normalize(&parsed);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(s) {
        return Value::String(
            timestamp
                .with_timezone(&Utc)
                .format(TIMESTAMP_FORMAT)
                .to_string(),
        );
    }
    Value::String(s.to_string())
}

/// Serializes `value`, optionally pretty-printed with a three-space indent.
///
/// # Errors
///
/// Returns a `System` record if serialization fails.
pub fn stringify<T: Serialize + ?Sized>(value: &T, prettify: bool) -> Result<String, ErrorRecord> {
    if !prettify {
        return Ok(serde_json::to_string(value)?);
    }

    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(PRETTY_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(out)
        .map_err(|e| ErrorRecord::system(format!("Invalid UTF-8 in JSON output: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_embedded_json_strings_are_parsed() {
        let value = json!({"settings": "{\"theme\": \"dark\", \"inner\": \"[1, 2]\"}"});
        assert_eq!(
            normalize(&value),
            json!({"settings": {"theme": "dark", "inner": [1, 2]}})
        );
    }

    #[test]
    fn test_plain_strings_untouched() {
        assert_eq!(normalize(&json!("xy")), json!("xy"));
        assert_eq!(normalize(&json!("007")), json!("007"));
    }

    #[test]
    fn test_timestamps_are_formatted() {
        let value = json!({
            "created": "2024-03-05T07:08:09.123Z",
            "offset": "2024-03-05T09:08:09+02:00",
        });
        assert_eq!(
            normalize(&value),
            json!({"created": "2024-03-05 07:08:09", "offset": "2024-03-05 07:08:09"})
        );
    }

    #[test]
    fn test_nested_arrays() {
        let value = json!([{"a": "1"}, null, ["true"]]);
        assert_eq!(normalize(&value), json!([{"a": 1}, null, [true]]));
    }

    #[test]
    fn test_stringify_pretty_indent() {
        let s = stringify(&json!({"a": 1}), true).unwrap();
        assert_eq!(s, "{\n   \"a\": 1\n}");
        assert_eq!(stringify(&json!({"a": 1}), false).unwrap(), "{\"a\":1}");
    }
}
