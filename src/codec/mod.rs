//! Body encoding and decoding per content-type.
//!
//! The codec layer is a pair of immutable lookup paths: short-name aliases
//! resolve to canonical MIME strings, and MIME strings select a serializer
//! or deserializer. Unrecognized types fall back to raw-bytes passthrough.

mod alias;
mod form;

pub use alias::{resolve_alias, MIME_FORM, MIME_HTML, MIME_JSON};

use serde_json::Value;

use crate::error::{DecodeError, Error};

/// Whether a MIME string names a JSON-family type.
///
/// Matches `application/json` exactly and any `*+json` structured-syntax
/// suffix (for example `application/vnd.api+json`). Media-type parameters
/// (`; charset=utf-8`) are ignored.
pub fn is_json_family(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or("").trim();
    essence == MIME_JSON || essence.ends_with("+json")
}

/// Serializes a structured value to bytes for the given MIME type.
///
/// JSON-family types use `serde_json`; the form-urlencoded type uses
/// `key=value&...` pairs with percent-escaping. Any other MIME type has no
/// structured serializer, so the value's JSON text is used as a raw body.
///
/// # Errors
///
/// Returns [`Error::BodySerialize`] if JSON encoding fails.
pub(crate) fn serialize(value: &Value, mime: &str) -> Result<Vec<u8>, Error> {
    if mime.split(';').next().unwrap_or("").trim() == MIME_FORM {
        if let Value::Object(map) = value {
            return Ok(form::encode(map));
        }
    }
    // JSON family and the unregistered-type fallback share one encoder
    Ok(serde_json::to_vec(value)?)
}

/// Decodes response body bytes per the declared MIME type.
///
/// JSON-family types parse into a structured [`Value`]; everything else is
/// returned as the raw UTF-8 string.
///
/// # Errors
///
/// Returns [`DecodeError::Json`] for malformed JSON under a JSON-family
/// content-type, or [`DecodeError::Utf8`] when the bytes are not UTF-8.
pub(crate) fn deserialize(bytes: &[u8], mime: &str) -> Result<Value, DecodeError> {
    if is_json_family(mime) {
        return serde_json::from_slice(bytes).map_err(|e| DecodeError::Json(e.to_string()));
    }
    let text = std::str::from_utf8(bytes).map_err(|e| DecodeError::Utf8(e.to_string()))?;
    Ok(Value::String(text.to_string()))
}
