//! Request construction and dispatch.
//!
//! A request accumulates configuration across chained calls and is sent by
//! exactly one terminal operation (`send` or `pipe_to`). Invoking a second
//! terminal operation fails with [`Error::AlreadySent`].

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::body::{Body, BodyInput};
use crate::codec;
use crate::config::{ClientConfig, WRITE_HIGH_WATER_MARK};
use crate::error::{Error, TransportError};
use crate::headers::HeaderMap;
use crate::method::Method;
use crate::redirect::{collect_response, RedirectFollower};
use crate::response::Response;
use crate::sink::StreamSink;
use crate::transport::{Transport, TransportRequest};

/// A mutable HTTP request being assembled for dispatch.
///
/// Configuration methods consume and return the request to permit chaining;
/// the terminal operations borrow it mutably so that a repeated terminal
/// call is answered with [`Error::AlreadySent`] instead of silently
/// re-sending.
///
/// # Examples
///
/// ```no_run
/// # async fn demo() -> Result<(), courier::Error> {
/// let mut req = courier::post("http://localhost:3000/echo")
///     .content_type("json")
///     .body(serde_json::json!({ "name": "tobi" }));
/// let res = req.send().await?;
/// assert!(res.ok());
/// # Ok(())
/// # }
/// ```
pub struct Request {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Body,
    redirect_limit: usize,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
    on_redirect: Option<Box<dyn FnMut(&Response) + Send>>,
    sent: bool,
    transport: Arc<dyn Transport>,
    user_agent: String,
}

/// Everything the dispatch loop needs, detached from the builder.
struct Prepared {
    request: TransportRequest,
    limit: usize,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
    observer: Option<Box<dyn FnMut(&Response) + Send>>,
}

impl Request {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        config: &ClientConfig,
        method: Method,
        url: &str,
    ) -> Self {
        Self {
            method,
            url: url.to_string(),
            headers: HeaderMap::new(),
            body: Body::Empty,
            redirect_limit: config.redirect_limit,
            timeout: config.timeout,
            cancel: None,
            on_redirect: None,
            sent: false,
            transport,
            user_agent: config.user_agent.clone(),
        }
    }

    /// Sets the content-type from a short alias (`"json"`, `"html"`,
    /// `"form-data"`, ...) or an explicit MIME string. Later calls override
    /// earlier ones.
    pub fn content_type(mut self, name_or_mime: &str) -> Self {
        let mime = codec::resolve_alias(name_or_mime);
        self.headers.insert("content-type", mime);
        self
    }

    /// Sets a request header. Same-name calls overwrite; names are
    /// case-insensitive.
    pub fn set(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Configures the request body.
    ///
    /// Raw strings and byte buffers are stored verbatim and leave the
    /// content-type untouched. Structured values (JSON objects) merge into
    /// the accumulated mapping by shallow key union and default the
    /// content-type to JSON at dispatch when none was declared.
    pub fn body(mut self, input: impl Into<BodyInput>) -> Self {
        match input.into() {
            BodyInput::Raw(bytes) => self.body.set_raw(bytes),
            BodyInput::Structured(map) => self.body.merge_structured(map),
        }
        self
    }

    /// Overrides the maximum number of redirect hops. Zero disables
    /// following entirely.
    pub fn redirect_limit(mut self, limit: usize) -> Self {
        self.redirect_limit = limit;
        self
    }

    /// Registers the redirect observer, invoked once per followed hop with
    /// the hop's 3xx response.
    pub fn on_redirect(mut self, observer: impl FnMut(&Response) + Send + 'static) -> Self {
        self.on_redirect = Some(Box::new(observer));
        self
    }

    /// Sets a deadline covering the whole logical request, redirect hops
    /// included.
    pub fn timeout(mut self, deadline: Duration) -> Self {
        self.timeout = Some(deadline);
        self
    }

    /// Attaches a cancellation token. Cancelling it aborts the in-flight
    /// hop and delivers [`Error::Cancelled`].
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Appends raw bytes to a streaming request body.
    ///
    /// Returns whether the buffered body is still under the high-water
    /// mark. `false` is a backpressure signal, not an error: the chunk was
    /// accepted either way, except on an already-sent request or a
    /// structured body, where the chunk is rejected.
    pub fn write_chunk(&mut self, chunk: impl AsRef<[u8]>) -> bool {
        if self.sent {
            warn!("write_chunk on a request that was already sent; chunk dropped");
            return false;
        }
        if !self.body.append_chunk(chunk.as_ref()) {
            warn!("write_chunk on a structured body; chunk dropped");
            return false;
        }
        self.body.buffered_len() < WRITE_HIGH_WATER_MARK
    }

    /// The request method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// The target URL text.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// A configured header value, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Sends the request and resolves with the terminal response of the
    /// redirect chain.
    ///
    /// HTTP error statuses (4xx/5xx) resolve normally; inspect the
    /// response's classification facets. Only transport failures,
    /// cancellation, and programmer misuse reject.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadySent`] on a repeated terminal call,
    /// [`Error::InvalidUrl`] for an unparseable target,
    /// [`Error::Transport`] for connect/TLS/timeout/I-O failures,
    /// [`Error::Cancelled`] when the attached token fires.
    pub async fn send(&mut self) -> Result<Response, Error> {
        let prepared = self.finalize()?;
        let transport = Arc::clone(&self.transport);
        run_guarded(prepared, move |request, limit, mut observer| async move {
            let follower = RedirectFollower::new(transport.as_ref(), limit, observer.as_deref_mut());
            let terminal = follower.run(request).await?;
            collect_response(terminal.reply, terminal.url).await
        })
        .await
    }

    /// Sends the request and pipes the terminal response body into `sink`
    /// fragment by fragment, calling the sink's `finish` once the stream
    /// ends.
    ///
    /// The resolved response carries status and headers; its body is empty
    /// because the bytes went to the sink.
    ///
    /// # Errors
    ///
    /// Everything `send` can return, plus [`Error::Sink`] when the sink
    /// rejects a chunk or fails to finish.
    pub async fn pipe_to<S: StreamSink>(&mut self, sink: &mut S) -> Result<Response, Error> {
        use futures::StreamExt;

        let prepared = self.finalize()?;
        let transport = Arc::clone(&self.transport);
        run_guarded(prepared, move |request, limit, mut observer| async move {
            let follower = RedirectFollower::new(transport.as_ref(), limit, observer.as_deref_mut());
            let terminal = follower.run(request).await?;
            let crate::transport::TransportReply { status, headers, mut body } = terminal.reply;
            while let Some(chunk) = body.next().await {
                let chunk = chunk.map_err(Error::Transport)?;
                sink.accept_chunk(&chunk).map_err(Error::Sink)?;
            }
            sink.finish().map_err(Error::Sink)?;
            Ok(Response::new(status, headers, terminal.url, Vec::new()))
        })
        .await
    }

    /// Serializes the pending body, fills in default headers, and marks
    /// the request sent.
    fn finalize(&mut self) -> Result<Prepared, Error> {
        if self.sent {
            return Err(Error::AlreadySent);
        }
        self.sent = true;

        let url = Url::parse(&self.url).map_err(|source| Error::InvalidUrl {
            url: self.url.clone(),
            source,
        })?;

        let mut headers = self.headers.clone();
        if self.body.is_structured() && !headers.contains("content-type") {
            headers.insert("content-type", codec::MIME_JSON);
        }
        if !headers.contains("user-agent") {
            headers.insert("user-agent", self.user_agent.clone());
        }

        let mime = headers.get("content-type").unwrap_or("").to_string();
        let body = std::mem::take(&mut self.body).into_bytes(&mime)?;
        debug!("dispatching {} {}", self.method, url);

        Ok(Prepared {
            request: TransportRequest {
                method: self.method,
                url,
                headers,
                body,
            },
            limit: self.redirect_limit,
            timeout: self.timeout,
            cancel: self.cancel.clone(),
            observer: self.on_redirect.take(),
        })
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("redirect_limit", &self.redirect_limit)
            .field("sent", &self.sent)
            .finish_non_exhaustive()
    }
}

/// Wraps the dispatch future with the request's cancellation token and
/// deadline.
async fn run_guarded<F, Fut>(prepared: Prepared, dispatch: F) -> Result<Response, Error>
where
    F: FnOnce(TransportRequest, usize, Option<Box<dyn FnMut(&Response) + Send>>) -> Fut,
    Fut: std::future::Future<Output = Result<Response, Error>>,
{
    let Prepared {
        request,
        limit,
        timeout,
        cancel,
        observer,
    } = prepared;

    let work = dispatch(request, limit, observer);
    let work = async move {
        match cancel {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => Err(Error::Cancelled),
                    result = work => result,
                }
            }
            None => work.await,
        }
    };
    match timeout {
        Some(deadline) => tokio::time::timeout(deadline, work)
            .await
            .map_err(|_| Error::Transport(TransportError::Timeout))?,
        None => work.await,
    }
}
