//! Core error taxonomy.
//!
//! Every adapter maps these variants onto its own surface: HTTP status codes
//! in the gateway, JSON-RPC error codes on the command channel.

use thiserror::Error;

/// Errors produced by the core services and the completion port.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The upstream runtime could not be reached.
    #[error("Upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The upstream runtime answered with a non-success status.
    #[error("Upstream returned status {status}: {body}")]
    UpstreamRejected { status: u16, body: String },

    /// No writing session with this id exists.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Invalid input (missing argument, out-of-range field, unknown model).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A save was requested for an empty draft.
    #[error("No draft content to save")]
    NoContent,

    /// Internal error (I/O, undecodable payloads, unexpected conditions).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns a suggested HTTP status code for this error.
    ///
    /// Upstream rejections pass the runtime's own status through.
    #[must_use]
    pub const fn suggested_status_code(&self) -> u16 {
        match self {
            Self::UpstreamUnavailable(_) => 503,
            Self::UpstreamRejected { status, .. } => *status,
            Self::SessionNotFound(_) => 404,
            Self::InvalidInput(_) | Self::NoContent => 400,
            Self::Internal(_) => 500,
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
