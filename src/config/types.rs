//! Client configuration types.

use std::time::Duration;

use crate::config::constants::{DEFAULT_REDIRECT_LIMIT, DEFAULT_USER_AGENT};

/// Configuration applied to every request issued through a [`Client`].
///
/// Per-request settings (`redirect_limit`, `timeout`) override these
/// defaults.
///
/// [`Client`]: crate::Client
///
/// # Examples
///
/// ```
/// use courier::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig {
///     user_agent: "my-app/1.0".to_string(),
///     timeout: Some(Duration::from_secs(10)),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User-Agent header value applied when the request sets none.
    pub user_agent: String,

    /// Default maximum number of redirect hops to follow.
    pub redirect_limit: usize,

    /// Optional deadline covering a whole logical request, redirect hops
    /// included. `None` means no deadline.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            redirect_limit: DEFAULT_REDIRECT_LIMIT,
            timeout: None,
        }
    }
}
