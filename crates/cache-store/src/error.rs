//! Error types for the cache store.

use thiserror::Error;

/// Errors that can occur when opening a cache store.
///
/// Reads and writes never fail loudly: misses and swallowed write errors
/// are part of the contract.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The cache directory could not be created.
    #[error("cache directory error: {0}")]
    Io(#[from] std::io::Error),
}
