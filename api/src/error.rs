//! API error handling.
//!
//! Maps domain errors to HTTP responses. Malformed input is a client error;
//! queue failures are server errors and are never retried here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::models::LogDecodeError;
use shared::queue::QueueError;
use thiserror::Error;

/// Error body returned by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Detailed error message.
    pub message: String,
}

/// Errors a request handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body is not an acceptable log entry.
    #[error(transparent)]
    InvalidBody(#[from] LogDecodeError),

    /// The queue did not confirm the operation.
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// Unexpected server-side failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Queue(QueueError::Unavailable(_) | QueueError::Timeout(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Queue(QueueError::Command(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidBody(e) => e.code(),
            Self::Queue(QueueError::Unavailable(_)) => "queue_unavailable",
            Self::Queue(QueueError::Timeout(_)) => "queue_timeout",
            Self::Queue(QueueError::Command(_)) => "queue_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        } else {
            tracing::debug!(error = %self, code = self.code(), "Rejected request");
        }

        let body = ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
