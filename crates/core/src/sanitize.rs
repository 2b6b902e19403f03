//! Payload cleaning applied to data entering the graph.
//!
//! Editors paste text full of zero-width characters and stray return glyphs;
//! a value that is blank once those are stripped is treated as absent.

use serde_json::Value;

use crate::node::Data;

/// Characters stripped from every string value.
const INVISIBLE: [char; 5] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}', '\u{21B5}'];

/// Whether a value counts as absent: null, an empty string or an empty object.
#[must_use]
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Clean one value.
///
/// Strings lose invisible characters and surrounding whitespace. Objects are
/// cleaned recursively and keys whose cleaned value is blank are dropped.
/// Arrays are cleaned element-wise but keep their length.
#[must_use]
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::String(s) => {
            let visible: String = s.chars().filter(|c| !INVISIBLE.contains(c)).collect();
            Value::String(visible.trim().to_string())
        }
        Value::Object(map) => Value::Object(sanitize_data(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        other => other,
    }
}

/// Clean a node payload, dropping blank entries.
#[must_use]
pub fn sanitize_data(data: Data) -> Data {
    data.into_iter()
        .map(|(key, value)| (key, sanitize_value(value)))
        .filter(|(_, value)| !is_blank(value))
        .collect()
}
