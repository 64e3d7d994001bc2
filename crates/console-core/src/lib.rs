//! Core types and gateway trait for the Herald console.
//!
//! This crate provides the shared interface between the console engine and
//! the Herald bot API. It defines:
//!
//! - [`IdentityRecord`] / [`IdentityLink`] - directory entries and the
//!   persisted links between them
//! - [`Gateway`] - the trait every API backend must implement
//! - [`ConfigDocument`] - the flat key/value configuration record
//! - [`GatewayError`] - error types for gateway operations
//!
//! # Example
//!
//! ```rust
//! use console_core::{async_trait, ConfigDocument, DirectoryKind, Gateway, GatewayError,
//!     ChannelInfo, IdentityLink, IdentityRecord, LibraryInfo, SaveOutcome};
//!
//! struct NullGateway;
//!
//! #[async_trait]
//! impl Gateway for NullGateway {
//!     async fn fetch_directory_records(
//!         &self,
//!         _kind: DirectoryKind,
//!     ) -> Result<Vec<IdentityRecord>, GatewayError> {
//!         Ok(Vec::new())
//!     }
//!     # async fn fetch_channels_for_guild(&self, _guild_id: &str) -> Result<Vec<ChannelInfo>, GatewayError> { Ok(Vec::new()) }
//!     # async fn load_mappings(&self) -> Result<Vec<IdentityLink>, GatewayError> { Ok(Vec::new()) }
//!     # async fn upsert_mapping(&self, _link: &IdentityLink) -> Result<(), GatewayError> { Ok(()) }
//!     # async fn delete_mapping(&self, _primary_id: &str) -> Result<(), GatewayError> { Ok(()) }
//!     # async fn load_libraries(&self) -> Result<Vec<LibraryInfo>, GatewayError> { Ok(Vec::new()) }
//!     # async fn load_config(&self) -> Result<ConfigDocument, GatewayError> { Ok(ConfigDocument::new()) }
//!     # async fn save_config(&self, _doc: &ConfigDocument) -> Result<SaveOutcome, GatewayError> { Ok(SaveOutcome::Saved) }
//! }
//! ```

mod document;
mod error;
mod gateway;
mod link;
mod records;

pub use document::ConfigDocument;
pub use error::GatewayError;
pub use gateway::{FieldError, Gateway, SaveOutcome};
pub use link::IdentityLink;
pub use records::{ChannelInfo, DirectoryKind, IdentityRecord, LibraryInfo};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
