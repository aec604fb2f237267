//! HTTP response representation.
//!
//! A response is immutable once constructed. The decoded body and the
//! status classification are computed on first access and memoized.

mod classify;

pub use classify::Classification;

use std::sync::OnceLock;

use serde_json::Value;
use url::Url;

use crate::codec;
use crate::error::DecodeError;
use crate::headers::HeaderMap;

/// A completed HTTP response: status, headers, raw body bytes, and lazily
/// decoded views of the body.
#[derive(Debug)]
pub struct Response {
    status: u16,
    headers: HeaderMap,
    url: Url,
    body: Vec<u8>,
    decoded: OnceLock<Result<Value, DecodeError>>,
    classification: OnceLock<Classification>,
}

impl Response {
    pub(crate) fn new(status: u16, headers: HeaderMap, url: Url, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            url,
            body,
            decoded: OnceLock::new(),
            classification: OnceLock::new(),
        }
    }

    /// Numeric status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The URL that produced this response (the final hop of a redirect
    /// chain).
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A single header value, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// The declared content-type, without media-type parameters.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get("content-type")
            .map(|v| v.split(';').next().unwrap_or("").trim())
    }

    /// Raw body bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// The body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Utf8`] when the body is not valid UTF-8.
    pub fn text(&self) -> Result<&str, DecodeError> {
        std::str::from_utf8(&self.body).map_err(|e| DecodeError::Utf8(e.to_string()))
    }

    /// The body decoded per the declared content-type.
    ///
    /// JSON-family responses parse into a structured [`Value`]; other types
    /// yield `Value::String` with the raw text. The decode runs once and is
    /// memoized, including its failure.
    ///
    /// # Errors
    ///
    /// Returns the [`DecodeError`] produced by the codec for this body.
    pub fn body(&self) -> Result<&Value, DecodeError> {
        let mime = self.content_type().unwrap_or("").to_string();
        self.decoded
            .get_or_init(|| codec::deserialize(&self.body, &mime))
            .as_ref()
            .map_err(|e| e.clone())
    }

    fn classification(&self) -> &Classification {
        self.classification
            .get_or_init(|| Classification::of(self.status))
    }

    /// Status in [200,300).
    pub fn ok(&self) -> bool {
        self.classification().ok
    }

    /// Status in [300,400).
    pub fn redirect(&self) -> bool {
        self.classification().redirect
    }

    /// Status in [400,500).
    pub fn client_error(&self) -> bool {
        self.classification().client_error
    }

    /// Status in [500,600).
    pub fn server_error(&self) -> bool {
        self.classification().server_error
    }

    /// Whether the status is any 4xx or 5xx.
    pub fn error(&self) -> bool {
        self.classification().error
    }

    /// Status == 404.
    pub fn not_found(&self) -> bool {
        self.classification().not_found
    }

    /// Status == 400.
    pub fn bad_request(&self) -> bool {
        self.classification().bad_request
    }

    /// Status == 401.
    pub fn unauthorized(&self) -> bool {
        self.classification().unauthorized
    }

    /// Status == 406.
    pub fn not_acceptable(&self) -> bool {
        self.classification().not_acceptable
    }

    /// Status == 204.
    pub fn no_content(&self) -> bool {
        self.classification().no_content
    }

    /// First digit of the status code (200 → 2, 404 → 4).
    pub fn status_type(&self) -> u16 {
        self.classification().status_type
    }
}
