//! The Gateway trait definition.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::document::ConfigDocument;
use crate::error::GatewayError;
use crate::link::IdentityLink;
use crate::records::{ChannelInfo, DirectoryKind, IdentityRecord, LibraryInfo};

/// A per-field validation failure reported by a config save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// Name of the rejected field.
    pub field: String,
    /// Validation message, surfaced to the operator verbatim.
    pub message: String,
}

/// Outcome of a config save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The document was accepted.
    Saved,
    /// One or more fields were rejected; local state is kept so the
    /// operator can correct and resubmit.
    Invalid(Vec<FieldError>),
}

/// The console's boundary to the Herald bot API.
///
/// Implementations range from the HTTP client in `gateway-client` to the
/// in-memory fixture in `mock-gateway`. This trait is object-safe and can
/// be used with `Box<dyn Gateway>`.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Fetch the full record list for one identity directory.
    async fn fetch_directory_records(
        &self,
        kind: DirectoryKind,
    ) -> Result<Vec<IdentityRecord>, GatewayError>;

    /// Fetch the channels of a guild.
    async fn fetch_channels_for_guild(
        &self,
        guild_id: &str,
    ) -> Result<Vec<ChannelInfo>, GatewayError>;

    /// Load the stored identity links.
    async fn load_mappings(&self) -> Result<Vec<IdentityLink>, GatewayError>;

    /// Create or replace a link, keyed by its primary id.
    async fn upsert_mapping(&self, link: &IdentityLink) -> Result<(), GatewayError>;

    /// Delete the link with the given primary id.
    async fn delete_mapping(&self, primary_id: &str) -> Result<(), GatewayError>;

    /// Load the media server's content libraries.
    async fn load_libraries(&self) -> Result<Vec<LibraryInfo>, GatewayError>;

    /// Load the bot's configuration document.
    async fn load_config(&self) -> Result<ConfigDocument, GatewayError>;

    /// Save the bot's configuration document.
    async fn save_config(&self, doc: &ConfigDocument) -> Result<SaveOutcome, GatewayError>;
}
