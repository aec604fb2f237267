//! courier: a fluent HTTP client with manual redirect tracking.
//!
//! This library provides a terse, chainable API for constructing and
//! dispatching HTTP requests: per-method entry points, content-type
//! negotiation through a codec registry, explicit redirect following with
//! per-hop notifications, and status classification facets on the response.
//!
//! # Example
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), courier::Error> {
//! let res = courier::post("http://localhost:3000/pets")
//!     .content_type("json")
//!     .body(serde_json::json!({ "name": "manny", "species": "cat" }))
//!     .send()
//!     .await?;
//!
//! if res.ok() {
//!     println!("created: {}", res.text().unwrap_or_default());
//! } else if res.client_error() {
//!     println!("rejected with {}", res.status());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! HTTP error statuses are never turned into `Err`: a 404 resolves normally
//! and sets `res.not_found()`. Only transport failures, cancellation, and
//! programmer misuse (sending twice) use the error channel.
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or call into it from an existing async context.

#![warn(missing_docs)]

mod body;
mod client;
mod codec;
pub mod config;
mod error;
mod headers;
mod method;
mod redirect;
mod request;
mod response;
mod sink;
pub mod transport;

// Re-export public API
pub use body::BodyInput;
pub use client::{delete, get, head, options, patch, post, put, Client};
pub use codec::{is_json_family, resolve_alias, MIME_FORM, MIME_HTML, MIME_JSON};
pub use config::ClientConfig;
pub use error::{DecodeError, Error, TransportError};
pub use headers::HeaderMap;
pub use method::Method;
pub use request::Request;
pub use response::{Classification, Response};
pub use sink::{StreamSink, WriterSink};
