//! Error types for gateway operations.

use thiserror::Error;

/// Errors that can occur when talking to the Herald bot API.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(String),

    /// The API answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The API answered success=false with a reason.
    #[error("Request rejected: {0}")]
    Rejected(String),
}
