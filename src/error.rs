//! Error Handling Module
//!
//! Every failure of a Config Lake call surfaces as a [`ConfigLakeError`].
//! Callers should branch on [`ConfigLakeError::kind`] rather than on message
//! text; the messages keep the wording of the other Config Lake clients
//! ("Authentication failed", "Access forbidden", ...) for code that still
//! pattern-matches on them.
//!
//! # Example
//!
//! ```rust,ignore
//! use configlake::{ConfigLakeClient, ErrorKind};
//!
//! match client.get_config(1, "production").await {
//!     Ok(configs) => println!("{} settings", configs.len()),
//!     Err(e) if e.kind() == ErrorKind::ResourceNotFound => println!("no such environment"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use thiserror::Error;

/// Errors returned by the Config Lake client
#[derive(Error, Debug)]
pub enum ConfigLakeError {
    /// HTTP 401: the token is missing or invalid.
    #[error("Authentication failed - invalid API token (endpoint={endpoint}, http=401)")]
    AuthenticationFailed { endpoint: String },

    /// HTTP 403: the token is not valid for the requested project/environment.
    #[error("Access forbidden - token not valid for this project (endpoint={endpoint}, http=403)")]
    AccessForbidden { endpoint: String },

    /// HTTP 404: the project or environment does not exist.
    #[error(
        "Resource not found - check project ID and environment name (endpoint={endpoint}, http=404)"
    )]
    ResourceNotFound { endpoint: String },

    /// The server could not be reached: DNS failure, refused connection or timeout.
    #[error("Connection error - {} (endpoint={endpoint})", describe_transport(.source))]
    ConnectionError {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Any other non-2xx status. Carries the raw body for diagnostics.
    #[error("API request failed: {status} {body} (endpoint={endpoint})")]
    UnexpectedServerError {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// A 2xx response whose body is not the expected JSON document.
    #[error("Malformed response - {source} (endpoint={endpoint}, http={status})")]
    MalformedResponse {
        endpoint: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// Arguments rejected before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The underlying HTTP client could not be configured.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Result type for Config Lake operations
pub type Result<T> = std::result::Result<T, ConfigLakeError>;

/// Coarse classification of a [`ConfigLakeError`], for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AuthenticationFailed,
    AccessForbidden,
    ResourceNotFound,
    ConnectionError,
    UnexpectedServerError,
    MalformedResponse,
    InvalidInput,
    ConfigurationError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::AuthenticationFailed => "authentication_failed",
            ErrorKind::AccessForbidden => "access_forbidden",
            ErrorKind::ResourceNotFound => "resource_not_found",
            ErrorKind::ConnectionError => "connection_error",
            ErrorKind::UnexpectedServerError => "unexpected_server_error",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::ConfigurationError => "configuration_error",
        };
        f.write_str(name)
    }
}

impl ConfigLakeError {
    /// Map a non-success HTTP status to the matching error.
    pub(crate) fn from_status(endpoint: &str, status: u16, body: String) -> Self {
        let endpoint = endpoint.to_string();
        match status {
            401 => Self::AuthenticationFailed { endpoint },
            403 => Self::AccessForbidden { endpoint },
            404 => Self::ResourceNotFound { endpoint },
            _ => Self::UnexpectedServerError {
                endpoint,
                status,
                body,
            },
        }
    }

    pub(crate) fn connection(endpoint: &str, source: reqwest::Error) -> Self {
        Self::ConnectionError {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    pub(crate) fn malformed(endpoint: &str, status: u16, source: serde_json::Error) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.to_string(),
            status,
            source,
        }
    }

    /// The kind of failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthenticationFailed { .. } => ErrorKind::AuthenticationFailed,
            Self::AccessForbidden { .. } => ErrorKind::AccessForbidden,
            Self::ResourceNotFound { .. } => ErrorKind::ResourceNotFound,
            Self::ConnectionError { .. } => ErrorKind::ConnectionError,
            Self::UnexpectedServerError { .. } => ErrorKind::UnexpectedServerError,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::ConfigurationError(_) => ErrorKind::ConfigurationError,
        }
    }

    /// HTTP status of the response that caused the error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthenticationFailed { .. } => Some(401),
            Self::AccessForbidden { .. } => Some(403),
            Self::ResourceNotFound { .. } => Some(404),
            Self::UnexpectedServerError { status, .. } | Self::MalformedResponse { status, .. } => {
                Some(*status)
            }
            Self::ConnectionError { .. } | Self::InvalidInput(_) | Self::ConfigurationError(_) => {
                None
            }
        }
    }

    /// Request path the error belongs to, e.g. `/api/config/1/production`.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::AuthenticationFailed { endpoint }
            | Self::AccessForbidden { endpoint }
            | Self::ResourceNotFound { endpoint }
            | Self::ConnectionError { endpoint, .. }
            | Self::UnexpectedServerError { endpoint, .. }
            | Self::MalformedResponse { endpoint, .. } => Some(endpoint),
            Self::InvalidInput(_) | Self::ConfigurationError(_) => None,
        }
    }

    /// Raw response body of an [`ConfigLakeError::UnexpectedServerError`].
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::UnexpectedServerError { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether the request ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ConnectionError { source, .. } if source.is_timeout())
    }

    /// Whether repeating the same call might succeed.
    ///
    /// The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError { .. } => true,
            Self::UnexpectedServerError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

fn describe_transport(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("failed to connect: {err}")
    } else {
        err.to_string()
    }
}
