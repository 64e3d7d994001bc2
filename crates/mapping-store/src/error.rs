//! Error types for the mapping store.

use thiserror::Error;

use console_core::GatewayError;

/// Errors that can occur during mapping operations.
#[derive(Debug, Error)]
pub enum MappingError {
    /// A gateway call failed.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Result type for mapping operations.
pub type Result<T> = std::result::Result<T, MappingError>;
