//! Error boundary for HTTP handlers.
//!
//! Every handler failure is converted to a status code and a
//! `{"detail": "..."}` JSON body here. Nothing is retried and nothing is
//! swallowed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Failure returned by any handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Rejected client input (400).
    #[error("{0}")]
    BadRequest(String),

    /// Missing file or asset (404).
    #[error("{0}")]
    NotFound(String),

    /// Upstream answered with an error status; its body is surfaced verbatim.
    #[error("upstream returned {status}")]
    Upstream { status: StatusCode, body: String },

    /// Upstream did not answer within the configured timeout (504).
    #[error("Upstream request timed out")]
    UpstreamTimeout,

    /// Upstream could not be reached (502).
    #[error("Upstream request failed: {0}")]
    Transport(String),

    /// Unexpected server-side failure (500).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status returned to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { status, .. } => *status,
            ApiError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Transport(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human-readable detail sent to the caller.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Upstream { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::UpstreamTimeout
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();

        if status.is_server_error() {
            tracing::error!(status = %status, detail = %detail, "Request failed");
        } else {
            tracing::warn!(status = %status, detail = %detail, "Request rejected");
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
