//! TLS connector setup for the default transport.
//!
//! Uses rustls with the webpki root certificate bundle; no client
//! certificates, no native trust store.

use std::sync::Arc;

use tokio_rustls::TlsConnector;

/// Builds the shared TLS connector used for `https` URLs.
pub(crate) fn connector() -> TlsConnector {
    let roots = rustls::RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };
    let config = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    TlsConnector::from(Arc::new(config))
}
