//! Transport collaborator interface.
//!
//! The request lifecycle engine never touches sockets directly; it hands a
//! [`TransportRequest`] to a [`Transport`] implementation once per hop and
//! consumes the reply. Transport failures are distinct from HTTP-level error
//! statuses: the former abort the logical request, the latter are data.

mod tcp;
mod tls;

pub use tcp::HttpTransport;

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use url::Url;

use crate::error::TransportError;
use crate::headers::HeaderMap;
use crate::method::Method;

/// The response body as an async sequence of byte fragments.
pub type BodyStream = BoxStream<'static, Result<Vec<u8>, TransportError>>;

/// One fully-prepared hop: serialized body, final headers, resolved URL.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method for this hop.
    pub method: Method,
    /// Absolute target URL.
    pub url: Url,
    /// Final request headers.
    pub headers: HeaderMap,
    /// Serialized body bytes, if any.
    pub body: Option<Vec<u8>>,
}

/// Status line, headers, and the still-streaming body of one hop.
pub struct TransportReply {
    /// Numeric status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Body fragments as they arrive from the peer.
    pub body: BodyStream,
}

/// A collaborator that performs one HTTP exchange.
///
/// Implementations must be shareable across concurrent requests; the engine
/// holds them behind `Arc`.
pub trait Transport: Send + Sync {
    /// Opens a connection, sends the request, and resolves once the status
    /// line and headers have been read. The body continues streaming through
    /// the reply.
    fn open(&self, request: TransportRequest) -> BoxFuture<'_, Result<TransportReply, TransportError>>;
}
