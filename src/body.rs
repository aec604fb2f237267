//! Pending request body.
//!
//! A body accumulates across chained configuration calls and is serialized
//! exactly once, when the terminal operation runs. Raw bodies replace each
//! other; structured bodies merge by shallow key union.

use serde_json::Value;

use crate::codec;
use crate::error::Error;

/// Accepted input for [`Request::body`].
///
/// Strings and byte buffers become raw bodies; JSON objects become the
/// structured mapping that merges across calls.
///
/// [`Request::body`]: crate::Request::body
pub enum BodyInput {
    /// Bytes sent verbatim.
    Raw(Vec<u8>),
    /// Key-value mapping serialized by the codec layer at dispatch.
    Structured(serde_json::Map<String, Value>),
}

impl From<&str> for BodyInput {
    fn from(s: &str) -> Self {
        BodyInput::Raw(s.as_bytes().to_vec())
    }
}

impl From<String> for BodyInput {
    fn from(s: String) -> Self {
        BodyInput::Raw(s.into_bytes())
    }
}

impl From<Vec<u8>> for BodyInput {
    fn from(bytes: Vec<u8>) -> Self {
        BodyInput::Raw(bytes)
    }
}

impl From<&[u8]> for BodyInput {
    fn from(bytes: &[u8]) -> Self {
        BodyInput::Raw(bytes.to_vec())
    }
}

impl From<serde_json::Map<String, Value>> for BodyInput {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        BodyInput::Structured(map)
    }
}

impl From<Value> for BodyInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => BodyInput::Structured(map),
            Value::String(s) => BodyInput::Raw(s.into_bytes()),
            other => BodyInput::Raw(other.to_string().into_bytes()),
        }
    }
}

/// The body payload accumulated on an unsent request.
#[derive(Debug, Clone, Default)]
pub(crate) enum Body {
    /// No body configured.
    #[default]
    Empty,
    /// Raw bytes sent verbatim. Also the accumulation target for
    /// `write_chunk` streaming writes.
    Raw(Vec<u8>),
    /// Key-value mapping pending serialization by the codec layer.
    Structured(serde_json::Map<String, Value>),
}

impl Body {
    /// Replaces the body with raw bytes.
    pub(crate) fn set_raw(&mut self, bytes: Vec<u8>) {
        *self = Body::Raw(bytes);
    }

    /// Merges a structured value into the accumulated mapping.
    ///
    /// Later calls add or override individual keys; they never replace the
    /// whole object. A prior raw body is discarded in favor of the mapping.
    pub(crate) fn merge_structured(&mut self, incoming: serde_json::Map<String, Value>) {
        match self {
            Body::Structured(existing) => {
                for (key, value) in incoming {
                    existing.insert(key, value);
                }
            }
            _ => *self = Body::Structured(incoming),
        }
    }

    /// Appends streaming bytes to a raw body, creating one if necessary.
    ///
    /// Returns `false` when the body is structured, which has no meaningful
    /// byte-append semantics.
    pub(crate) fn append_chunk(&mut self, chunk: &[u8]) -> bool {
        match self {
            Body::Empty => {
                *self = Body::Raw(chunk.to_vec());
                true
            }
            Body::Raw(buf) => {
                buf.extend_from_slice(chunk);
                true
            }
            Body::Structured(_) => false,
        }
    }

    /// Buffered length in bytes of a raw body; zero otherwise.
    pub(crate) fn buffered_len(&self) -> usize {
        match self {
            Body::Raw(buf) => buf.len(),
            _ => 0,
        }
    }

    /// Whether a structured mapping is pending serialization.
    pub(crate) fn is_structured(&self) -> bool {
        matches!(self, Body::Structured(_))
    }

    /// Serializes the body for the wire.
    ///
    /// Structured mappings go through the codec for `mime`; raw bytes pass
    /// through untouched; an empty body yields `None`.
    pub(crate) fn into_bytes(self, mime: &str) -> Result<Option<Vec<u8>>, Error> {
        match self {
            Body::Empty => Ok(None),
            Body::Raw(buf) => Ok(Some(buf)),
            Body::Structured(map) => codec::serialize(&Value::Object(map), mime).map(Some),
        }
    }
}
