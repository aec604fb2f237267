//! Configuration constants.
//!
//! Defaults and operational limits used across the crate.

/// Maximum number of redirect hops followed by default.
/// Prevents runaway redirect chains while accommodating typical sites.
pub const DEFAULT_REDIRECT_LIMIT: usize = 5;

/// Default User-Agent header value for outgoing requests.
pub const DEFAULT_USER_AGENT: &str = concat!("courier/", env!("CARGO_PKG_VERSION"));

// Network operation timeouts
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// TLS handshake timeout in seconds
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 5;

/// High-water mark in bytes for the buffered streaming request body.
/// `write_chunk` keeps accepting data past this point but reports
/// backpressure to the caller via its boolean return.
pub const WRITE_HIGH_WATER_MARK: usize = 64 * 1024;

/// Read granularity for response body streaming (8KB per fragment).
pub const READ_CHUNK_SIZE: usize = 8 * 1024;
