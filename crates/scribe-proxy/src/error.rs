//! Gateway error type and its HTTP mapping.
//!
//! Every error leaves the gateway as an OpenAI-style `{"error": {...}}` body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use scribe_core::CoreError;

use crate::models::ErrorResponse;

/// Gateway-level error.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The upstream runtime is unreachable.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The upstream runtime rejected the request; its status is passed on.
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(msg, "invalid_request_error"),
            ),
            Self::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(msg, "not_found_error"),
            ),
            Self::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::upstream_unavailable(&msg),
            ),
            Self::Upstream { status, message } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                ErrorResponse::with_code(
                    format!("Ollama API error: {message}"),
                    "upstream_error",
                    status.to_string(),
                ),
            ),
            Self::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(msg, "server_error"),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UpstreamUnavailable(msg) => Self::ServiceUnavailable(msg),
            CoreError::UpstreamRejected { status, body } => Self::Upstream {
                status,
                message: body,
            },
            CoreError::SessionNotFound(id) => Self::NotFound(format!("Session not found: {id}")),
            CoreError::InvalidInput(msg) => Self::BadRequest(msg),
            err @ CoreError::NoContent => Self::BadRequest(err.to_string()),
            CoreError::Internal(msg) => Self::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: CoreError) -> StatusCode {
        HttpError::from(err).into_response().status()
    }

    #[test]
    fn test_core_error_mapping() {
        assert_eq!(
            status_of(CoreError::UpstreamUnavailable("refused".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(CoreError::UpstreamRejected {
                status: 404,
                body: "model 'x' not found".into()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CoreError::SessionNotFound("s".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CoreError::InvalidInput("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(CoreError::NoContent), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(CoreError::Internal("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_upstream_status_becomes_bad_gateway() {
        let response = HttpError::Upstream {
            status: 42,
            message: "weird".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
