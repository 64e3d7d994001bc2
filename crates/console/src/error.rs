//! Error types for the console session.

use thiserror::Error;

use console_core::{DirectoryKind, GatewayError};

/// Errors that can occur in console session operations.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The triggering control is disabled while a call is in flight.
    #[error("{0} is already in progress")]
    Busy(&'static str),

    /// A gateway call failed.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// A mapping operation failed.
    #[error("Mapping error: {0}")]
    Mapping(#[from] mapping_store::MappingError),

    /// The snapshot store could not be opened.
    #[error("Cache store error: {0}")]
    Store(#[from] cache_store::StoreError),

    /// Linking needs one selection from each directory.
    #[error("both identities must be selected before linking")]
    IncompleteSelection,

    /// A chosen id is not present in the directory cache.
    #[error("no record {id} in the {directory} directory")]
    UnknownRecord {
        directory: DirectoryKind,
        id: String,
    },
}

/// Result type for console operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;
