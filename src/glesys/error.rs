//! GleSYS client error types.

use http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors returned by the GleSYS client.
#[derive(Debug, Error)]
pub enum GlesysError {
    /// The API answered with a non-2xx status.
    #[error("GleSYS API error {status}: {message}")]
    Api { status: StatusCode, message: String },

    /// The request never produced a response.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("could not parse response: {0}")]
    Json(#[from] serde_json::Error),

    /// The client configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    response: ErrorResponse,
}

#[derive(Deserialize)]
struct ErrorResponse {
    status: ErrorStatus,
}

#[derive(Deserialize)]
struct ErrorStatus {
    text: String,
}

impl GlesysError {
    /// Build an [`GlesysError::Api`] from an error response, preferring the
    /// `response.status.text` of a JSON envelope over the raw body.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let message = match serde_json::from_slice::<ErrorEnvelope>(body) {
            Ok(envelope) => envelope.response.status.text,
            Err(_) => {
                let raw = String::from_utf8_lossy(body).trim().to_string();
                if raw.is_empty() {
                    status.canonical_reason().unwrap_or("Unknown").to_string()
                } else {
                    raw
                }
            }
        };
        GlesysError::Api { status, message }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GlesysError::Api { status, .. } => Some(*status),
            GlesysError::Http(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Server faults and rate limiting are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            GlesysError::Api { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            GlesysError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

pub(crate) fn empty_on_not_found<T>(result: Result<Vec<T>, GlesysError>) -> Result<Vec<T>, GlesysError> {
    match result {
        Err(e) if e.is_not_found() => Ok(Vec::new()),
        other => other,
    }
}

pub(crate) fn none_on_not_found<T>(result: Result<T, GlesysError>) -> Result<Option<T>, GlesysError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
