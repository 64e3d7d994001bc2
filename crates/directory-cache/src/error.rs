//! Error types for directory caches.

use thiserror::Error;

use console_core::GatewayError;

/// Errors that can occur while loading a directory.
///
/// A load failure is never fatal: the cache keeps serving its last-known
/// records and the error rides along in the load outcome.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The live fetch against the bot API failed.
    #[error("directory fetch failed: {0}")]
    Fetch(#[from] GatewayError),
}
