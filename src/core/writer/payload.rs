//! Payload normalization
//!
//! JSON documents are re-serialized with sorted keys and four-space
//! indentation so two exports of the same object are byte-identical.
//! Everything else is written as received.

use crate::domain::Result;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

/// Serialize a JSON value in canonical form
///
/// Object keys are sorted at every depth and the output is indented with
/// four spaces. Non-ASCII characters are written as UTF-8, not as `\uXXXX`
/// escapes, so titles like `Übersicht` stay readable in diffs. Files
/// written by tools that escape to ASCII differ byte-for-byte from these
/// for such titles, while parsing to the same value.
///
/// # Example
///
/// ```rust
/// use grafex::core::writer::payload::to_canonical_json;
/// use serde_json::json;
///
/// let text = to_canonical_json(&json!({"b": 1, "a": [true]})).unwrap();
/// assert_eq!(text, "{\n    \"a\": [\n        true\n    ],\n    \"b\": 1\n}");
/// ```
pub fn to_canonical_json(value: &Value) -> Result<String> {
    let sorted = sort_keys(value);

    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    sorted.serialize(&mut serializer)?;

    String::from_utf8(buf).map_err(|e| {
        crate::domain::GrafexError::Serialization(format!("Serialized JSON is not UTF-8: {e}"))
    })
}

/// Parse raw JSON text and return it in canonical form
pub fn canonicalize_json_text(text: &str) -> Result<String> {
    let value: Value = serde_json::from_str(text)?;
    to_canonical_json(&value)
}

/// Ensure text ends with exactly one newline
pub fn with_trailing_newline(text: &str) -> String {
    let mut out = text.trim_end_matches(['\r', '\n']).to_string();
    out.push('\n');
    out
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), sort_keys(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
