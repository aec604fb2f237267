//! Client and request entry points.
//!
//! A [`Client`] pairs a transport with default configuration and hands out
//! requests. The free functions (`get`, `post`, ...) use a lazily
//! initialized shared client over the default transport, for callers who
//! don't need custom configuration.

use std::sync::Arc;
use std::sync::OnceLock;

use crate::config::ClientConfig;
use crate::method::Method;
use crate::request::Request;
use crate::transport::{HttpTransport, Transport};

/// Issues requests against a shared transport with common defaults.
///
/// Cloning a client is cheap; clones share the transport.
///
/// # Examples
///
/// ```no_run
/// # async fn demo() -> Result<(), courier::Error> {
/// let client = courier::Client::new();
/// let res = client.get("http://localhost:3000/login").send().await?;
/// assert_eq!(res.status(), 200);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl Client {
    /// Creates a client over the default transport with default
    /// configuration.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client over the default transport with the given
    /// configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            transport: Arc::new(HttpTransport::new()),
            config,
        }
    }

    /// Creates a client over a caller-supplied transport collaborator.
    pub fn with_transport(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Starts a request with an arbitrary method.
    pub fn request(&self, method: Method, url: &str) -> Request {
        Request::new(Arc::clone(&self.transport), &self.config, method, url)
    }

    /// Starts a GET request.
    pub fn get(&self, url: &str) -> Request {
        self.request(Method::Get, url)
    }

    /// Starts a HEAD request.
    pub fn head(&self, url: &str) -> Request {
        self.request(Method::Head, url)
    }

    /// Starts a POST request.
    pub fn post(&self, url: &str) -> Request {
        self.request(Method::Post, url)
    }

    /// Starts a PUT request.
    pub fn put(&self, url: &str) -> Request {
        self.request(Method::Put, url)
    }

    /// Starts a DELETE request.
    pub fn delete(&self, url: &str) -> Request {
        self.request(Method::Delete, url)
    }

    /// Starts a PATCH request.
    pub fn patch(&self, url: &str) -> Request {
        self.request(Method::Patch, url)
    }

    /// Starts an OPTIONS request.
    pub fn options(&self, url: &str) -> Request {
        self.request(Method::Options, url)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

fn shared_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(Client::new)
}

/// Starts a GET request on the shared default client.
pub fn get(url: &str) -> Request {
    shared_client().get(url)
}

/// Starts a HEAD request on the shared default client.
pub fn head(url: &str) -> Request {
    shared_client().head(url)
}

/// Starts a POST request on the shared default client.
pub fn post(url: &str) -> Request {
    shared_client().post(url)
}

/// Starts a PUT request on the shared default client.
pub fn put(url: &str) -> Request {
    shared_client().put(url)
}

/// Starts a DELETE request on the shared default client.
pub fn delete(url: &str) -> Request {
    shared_client().delete(url)
}

/// Starts a PATCH request on the shared default client.
pub fn patch(url: &str) -> Request {
    shared_client().patch(url)
}

/// Starts an OPTIONS request on the shared default client.
pub fn options(url: &str) -> Request {
    shared_client().options(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_points_set_method_and_url() {
        let client = Client::new();
        let req = client.post("http://localhost:3000/echo");
        assert_eq!(req.method(), Method::Post);
        assert_eq!(req.url(), "http://localhost:3000/echo");

        let req = get("http://localhost:3000/login");
        assert_eq!(req.method(), Method::Get);
    }

    #[test]
    fn test_clones_share_transport() {
        let client = Client::new();
        let clone = client.clone();
        assert!(Arc::ptr_eq(&client.transport, &clone.transport));
    }
}
