//! Request tracing and response decoding shared by the async and blocking clients.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::Span;

use crate::defaults;
use crate::endpoint::Endpoint;
use crate::error::{ConfigLakeError, Result};

/// Span wrapping one Config Lake request.
pub(crate) fn request_span(endpoint: Endpoint, project_id: u64, environment: &str) -> Span {
    tracing::debug_span!(
        "configlake.request",
        endpoint = %endpoint,
        project_id,
        environment
    )
}

/// Emit the single warning a failed call produces. Call inside the request span.
pub(crate) fn log_failure(err: &ConfigLakeError) {
    tracing::warn!(kind = %err.kind(), status = ?err.status(), "request failed: {err}");
}

/// Turn a received status and body into the decoded document or an error.
///
/// Any 2xx status is success. The body of a failed response is only kept for
/// diagnostics; the status alone decides the error kind.
pub(crate) fn decode<T: DeserializeOwned>(
    path: &str,
    status: StatusCode,
    text: String,
    started: Instant,
) -> Result<T> {
    tracing::debug!(
        status = status.as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        bytes = text.len(),
        "received response"
    );

    if !status.is_success() {
        if !text.is_empty() {
            let sample: String = text
                .chars()
                .take(defaults::errors::BODY_SAMPLE_CHARS)
                .collect();
            tracing::debug!(body_sample = %sample, "error response body");
        }
        return Err(ConfigLakeError::from_status(path, status.as_u16(), text));
    }

    serde_json::from_str(&text).map_err(|e| ConfigLakeError::malformed(path, status.as_u16(), e))
}
