use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;

/// Failure of a single upstream call. Always handled locally: listing
/// endpoints turn any of these into their fallback payload, lookup endpoints
/// map them to a `LookupError`.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("upstream timed out")]
    Timeout,
    #[error("upstream request failed: {0}")]
    Transport(reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(StatusCode),
    #[error("upstream returned invalid JSON: {0}")]
    Decode(String),
}

/// Contract for single-resource-by-key endpoints: unlike the listing
/// endpoints, these surface 404/500 so callers can tell "doesn't exist"
/// from "list is empty".
#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{1}")]
    UpstreamStatus(StatusCode, &'static str),
    #[error("{0}")]
    Internal(&'static str),
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            LookupError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            LookupError::UpstreamStatus(status, message) => (status, message),
            LookupError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid upstream base URL: {0}")]
    InvalidUpstream(#[from] url::ParseError),
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
