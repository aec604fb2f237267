//! Status code classification.
//!
//! Classification is a pure function of the numeric status code. Facets are
//! data, not errors: a true `error` facet never prevents delivery of the
//! response it describes.

/// Derived, read-only facets of a response status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Status in [200,300).
    pub ok: bool,
    /// Status in [300,400).
    pub redirect: bool,
    /// Status in [400,500).
    pub client_error: bool,
    /// Status in [500,600).
    pub server_error: bool,
    /// `client_error` or `server_error`.
    pub error: bool,
    /// Status == 404.
    pub not_found: bool,
    /// Status == 400.
    pub bad_request: bool,
    /// Status == 401.
    pub unauthorized: bool,
    /// Status == 406.
    pub not_acceptable: bool,
    /// Status == 204.
    pub no_content: bool,
    /// First digit of the status (integer division by 100).
    pub status_type: u16,
}

impl Classification {
    /// Classifies a numeric status code.
    pub fn of(status: u16) -> Self {
        let client_error = (400..500).contains(&status);
        let server_error = (500..600).contains(&status);
        Self {
            ok: (200..300).contains(&status),
            redirect: (300..400).contains(&status),
            client_error,
            server_error,
            error: client_error || server_error,
            not_found: status == 404,
            bad_request: status == 400,
            unauthorized: status == 401,
            not_acceptable: status == 406,
            no_content: status == 204,
            status_type: status / 100,
        }
    }
}
