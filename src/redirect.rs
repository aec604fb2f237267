//! Redirect-following state machine.
//!
//! Following is an explicit loop rather than callback recursion, so the
//! remaining hop count, visited-URL history, and the current state are all
//! inspectable.
//! The machine moves `Dispatching → (Redirecting | Completed | Failed)`,
//! with `Redirecting` looping back into `Dispatching` at the resolved
//! Location.

use futures::StreamExt;
use log::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::headers::HeaderMap;
use crate::method::Method;
use crate::response::Response;
use crate::transport::{Transport, TransportReply, TransportRequest};

/// Statuses the follower re-dispatches on. Other 3xx codes (e.g. 304) are
/// terminal results.
const FOLLOWED_STATUSES: &[u16] = &[301, 302, 303, 307, 308];

/// Observer invoked once per hop with the hop's 3xx response.
pub(crate) type RedirectObserver = dyn FnMut(&Response) + Send;

/// The terminal exchange of a redirect chain: the reply still carries its
/// body stream, so callers choose between collecting and piping.
pub(crate) struct TerminalHop {
    pub reply: TransportReply,
    pub url: Url,
}

enum FollowState {
    Dispatching(TransportRequest),
    Redirecting {
        previous: Response,
        request: TransportRequest,
    },
}

/// Drives repeated dispatch through the transport until a non-redirect
/// response arrives or the hop limit is reached.
pub(crate) struct RedirectFollower<'a> {
    transport: &'a dyn Transport,
    remaining: usize,
    observer: Option<&'a mut RedirectObserver>,
}

impl<'a> RedirectFollower<'a> {
    pub(crate) fn new(
        transport: &'a dyn Transport,
        limit: usize,
        observer: Option<&'a mut RedirectObserver>,
    ) -> Self {
        Self {
            transport,
            remaining: limit,
            observer,
        }
    }

    /// Runs the state machine to its terminal response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] when any hop fails at the transport
    /// level; the remaining chain is abandoned.
    pub(crate) async fn run(mut self, request: TransportRequest) -> Result<TerminalHop, Error> {
        let mut chain: Vec<Url> = Vec::new();
        let mut state = FollowState::Dispatching(request);

        loop {
            match state {
                FollowState::Dispatching(request) => {
                    let url = request.url.clone();
                    let reply = self.transport.open(request.clone()).await?;

                    if !self.should_follow(reply.status, &reply.headers, &url) {
                        if !chain.is_empty() {
                            debug!("redirect chain resolved after {} hop(s): {:?}", chain.len(), chain);
                        }
                        return Ok(TerminalHop { reply, url });
                    }

                    let next = self.next_request(&reply, request)?;
                    chain.push(next.url.clone());
                    let previous = collect_response(reply, url).await?;
                    state = FollowState::Redirecting { previous, request: next };
                }
                FollowState::Redirecting { previous, request } => {
                    debug!(
                        "following {} redirect to {} ({} hop(s) left)",
                        previous.status(),
                        request.url,
                        self.remaining
                    );
                    if let Some(observer) = self.observer.as_deref_mut() {
                        observer(&previous);
                    }
                    state = FollowState::Dispatching(request);
                }
            }
        }
    }

    fn should_follow(&self, status: u16, headers: &HeaderMap, url: &Url) -> bool {
        if !FOLLOWED_STATUSES.contains(&status) {
            return false;
        }
        if self.remaining == 0 {
            debug!("redirect limit reached at {}; delivering {} as-is", url, status);
            return false;
        }
        if !headers.contains("location") {
            warn!("redirect status {} for {} but no Location header", status, url);
            return false;
        }
        true
    }

    /// Builds the next hop's request, applying the method/body policy:
    /// GET/HEAD are preserved verbatim; 307/308 re-send method and body;
    /// any other followed status downgrades to GET and drops the body.
    fn next_request(
        &mut self,
        reply: &TransportReply,
        request: TransportRequest,
    ) -> Result<TransportRequest, Error> {
        let location = reply.headers.get("location").unwrap_or_default();
        let target = request
            .url
            .join(location)
            .map_err(|source| Error::InvalidUrl {
                url: location.to_string(),
                source,
            })?;
        self.remaining -= 1;

        let mut next = TransportRequest {
            method: request.method,
            url: target,
            headers: request.headers,
            body: request.body,
        };
        if !next.method.preserved_on_redirect() && !matches!(reply.status, 307 | 308) {
            if next.body.is_some() {
                warn!(
                    "{} redirect: downgrading {} to GET and dropping the request body",
                    reply.status, next.method
                );
            }
            next.method = Method::Get;
            next.body = None;
            next.headers.remove("content-type");
        }
        Ok(next)
    }
}

/// Drains a reply's body stream and assembles an immutable [`Response`].
pub(crate) async fn collect_response(reply: TransportReply, url: Url) -> Result<Response, Error> {
    let TransportReply { status, headers, mut body } = reply;
    let mut bytes = Vec::new();
    while let Some(chunk) = body.next().await {
        bytes.extend_from_slice(&chunk.map_err(Error::Transport)?);
    }
    Ok(Response::new(status, headers, url, bytes))
}
