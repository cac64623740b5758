//! Default Configuration Values
//!
//! Centralizes the defaults used by the Config Lake client so they can be
//! adjusted in one place.

use std::time::Duration;

/// HTTP client default configurations
pub mod http {
    use super::*;

    /// Default request timeout for a single API call.
    ///
    /// Covers connecting, sending the request and reading the whole body.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default connection timeout for establishing HTTP connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default User-Agent string for HTTP requests
    pub const USER_AGENT: &str = concat!("configlake-rs/", env!("CARGO_PKG_VERSION"));
}

/// Error reporting limits
pub mod errors {
    /// Maximum number of characters of a response body kept in log events.
    ///
    /// Errors themselves keep the full body.
    pub const BODY_SAMPLE_CHARS: usize = 200;
}
