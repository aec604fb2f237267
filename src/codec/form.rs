//! Form-urlencoded body serialization.

use serde_json::Value;

/// Serializes a structured value as `application/x-www-form-urlencoded`.
///
/// Scalar values render without quoting (`{"name":"tobi"}` becomes
/// `name=tobi`); nested arrays and objects fall back to their compact JSON
/// text as the pair value. Keys and values are percent-escaped.
pub(crate) fn encode(map: &serde_json::Map<String, Value>) -> Vec<u8> {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in map {
        serializer.append_pair(key, &scalar_text(value));
    }
    serializer.finish().into_bytes()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        // Nested structures have no standard urlencoded form
        other => other.to_string(),
    }
}
