//! In-memory gateway fixtures for Herald console tests.
//!
//! [`MockGateway`] implements the [`Gateway`] trait against scripted
//! fixtures: directory records, channels, libraries, a mapping table with
//! the server's upsert-by-primary-id semantics, and a config document.
//! Every call is recorded so tests can assert on traffic (reconciliation
//! idempotence is "zero upserts on the second run"), and any operation can
//! be switched to fail to exercise fallback paths.
//!
//! # Example
//!
//! ```rust
//! use console_core::{DirectoryKind, Gateway, IdentityRecord};
//! use mock_gateway::{Call, MockGateway};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), console_core::GatewayError> {
//! let gateway = MockGateway::new()
//!     .with_members(vec![IdentityRecord::new("100", "Alice")]);
//!
//! let records = gateway.fetch_directory_records(DirectoryKind::ChatMembers).await?;
//! assert_eq!(records.len(), 1);
//! assert_eq!(gateway.calls().await, vec![Call::FetchDirectory(DirectoryKind::ChatMembers)]);
//! # Ok(())
//! # }
//! ```

use std::collections::{HashMap, HashSet};

use tokio::sync::Mutex;

use console_core::{
    async_trait, ChannelInfo, ConfigDocument, DirectoryKind, FieldError, Gateway, GatewayError,
    IdentityLink, IdentityRecord, LibraryInfo, SaveOutcome,
};

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchDirectory(DirectoryKind),
    FetchChannels { guild_id: String },
    LoadMappings,
    UpsertMapping { primary_id: String },
    DeleteMapping { primary_id: String },
    LoadLibraries,
    LoadConfig,
    SaveConfig,
}

/// An operation that can be switched to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchDirectory(DirectoryKind),
    FetchChannels,
    LoadMappings,
    UpsertMapping,
    DeleteMapping,
    LoadLibraries,
    LoadConfig,
    SaveConfig,
}

#[derive(Debug, Default)]
struct Inner {
    directories: HashMap<DirectoryKind, Vec<IdentityRecord>>,
    channels: Vec<ChannelInfo>,
    libraries: Vec<LibraryInfo>,
    mappings: Vec<IdentityLink>,
    config: ConfigDocument,
    failing: HashSet<Operation>,
    rejected_fields: Vec<FieldError>,
    calls: Vec<Call>,
}

impl Inner {
    fn check(&mut self, op: Operation, call: Call) -> Result<(), GatewayError> {
        self.calls.push(call);
        if self.failing.contains(&op) {
            return Err(GatewayError::Http("simulated connection failure".to_string()));
        }
        Ok(())
    }
}

/// Scripted in-memory implementation of the [`Gateway`] trait.
#[derive(Debug, Default)]
pub struct MockGateway {
    inner: Mutex<Inner>,
}

impl MockGateway {
    /// Create a gateway with no fixtures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the chat-members directory.
    pub fn with_members(mut self, records: Vec<IdentityRecord>) -> Self {
        self.inner
            .get_mut()
            .directories
            .insert(DirectoryKind::ChatMembers, records);
        self
    }

    /// Seed the service-users directory.
    pub fn with_users(mut self, records: Vec<IdentityRecord>) -> Self {
        self.inner
            .get_mut()
            .directories
            .insert(DirectoryKind::ServiceUsers, records);
        self
    }

    /// Seed the guild channel list.
    pub fn with_channels(mut self, channels: Vec<ChannelInfo>) -> Self {
        self.inner.get_mut().channels = channels;
        self
    }

    /// Seed the library list.
    pub fn with_libraries(mut self, libraries: Vec<LibraryInfo>) -> Self {
        self.inner.get_mut().libraries = libraries;
        self
    }

    /// Seed the stored mapping table.
    pub fn with_mappings(mut self, mappings: Vec<IdentityLink>) -> Self {
        self.inner.get_mut().mappings = mappings;
        self
    }

    /// Seed the stored config document.
    pub fn with_config(mut self, config: ConfigDocument) -> Self {
        self.inner.get_mut().config = config;
        self
    }

    /// Switch an operation between failing and succeeding.
    pub async fn set_failing(&self, op: Operation, failing: bool) {
        let mut inner = self.inner.lock().await;
        if failing {
            inner.failing.insert(op);
        } else {
            inner.failing.remove(&op);
        }
    }

    /// Make the next saves report a per-field validation failure.
    pub async fn reject_field(&self, field: impl Into<String>, message: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner.rejected_fields.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Replace one directory's records (e.g., to simulate upstream churn).
    pub async fn replace_directory(&self, kind: DirectoryKind, records: Vec<IdentityRecord>) {
        let mut inner = self.inner.lock().await;
        inner.directories.insert(kind, records);
    }

    /// All calls recorded so far.
    pub async fn calls(&self) -> Vec<Call> {
        self.inner.lock().await.calls.clone()
    }

    /// Drop the recorded call log.
    pub async fn clear_calls(&self) {
        self.inner.lock().await.calls.clear();
    }

    /// Count of recorded upsert calls.
    pub async fn upsert_count(&self) -> usize {
        self.inner
            .lock()
            .await
            .calls
            .iter()
            .filter(|call| matches!(call, Call::UpsertMapping { .. }))
            .count()
    }

    /// Snapshot of the stored mapping table.
    pub async fn stored_mappings(&self) -> Vec<IdentityLink> {
        self.inner.lock().await.mappings.clone()
    }

    /// Snapshot of the stored config document.
    pub async fn stored_config(&self) -> ConfigDocument {
        self.inner.lock().await.config.clone()
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn fetch_directory_records(
        &self,
        kind: DirectoryKind,
    ) -> Result<Vec<IdentityRecord>, GatewayError> {
        let mut inner = self.inner.lock().await;
        inner.check(Operation::FetchDirectory(kind), Call::FetchDirectory(kind))?;
        Ok(inner.directories.get(&kind).cloned().unwrap_or_default())
    }

    async fn fetch_channels_for_guild(
        &self,
        guild_id: &str,
    ) -> Result<Vec<ChannelInfo>, GatewayError> {
        let mut inner = self.inner.lock().await;
        inner.check(
            Operation::FetchChannels,
            Call::FetchChannels {
                guild_id: guild_id.to_string(),
            },
        )?;
        Ok(inner.channels.clone())
    }

    async fn load_mappings(&self) -> Result<Vec<IdentityLink>, GatewayError> {
        let mut inner = self.inner.lock().await;
        inner.check(Operation::LoadMappings, Call::LoadMappings)?;
        Ok(inner.mappings.clone())
    }

    async fn upsert_mapping(&self, link: &IdentityLink) -> Result<(), GatewayError> {
        let mut inner = self.inner.lock().await;
        inner.check(
            Operation::UpsertMapping,
            Call::UpsertMapping {
                primary_id: link.primary_id.clone(),
            },
        )?;
        match inner
            .mappings
            .iter_mut()
            .find(|existing| existing.primary_id == link.primary_id)
        {
            Some(existing) => *existing = link.clone(),
            None => inner.mappings.push(link.clone()),
        }
        Ok(())
    }

    async fn delete_mapping(&self, primary_id: &str) -> Result<(), GatewayError> {
        let mut inner = self.inner.lock().await;
        inner.check(
            Operation::DeleteMapping,
            Call::DeleteMapping {
                primary_id: primary_id.to_string(),
            },
        )?;
        let before = inner.mappings.len();
        inner.mappings.retain(|link| link.primary_id != primary_id);
        if inner.mappings.len() == before {
            return Err(GatewayError::Rejected(format!(
                "no mapping for {}",
                primary_id
            )));
        }
        Ok(())
    }

    async fn load_libraries(&self) -> Result<Vec<LibraryInfo>, GatewayError> {
        let mut inner = self.inner.lock().await;
        inner.check(Operation::LoadLibraries, Call::LoadLibraries)?;
        Ok(inner.libraries.clone())
    }

    async fn load_config(&self) -> Result<ConfigDocument, GatewayError> {
        let mut inner = self.inner.lock().await;
        inner.check(Operation::LoadConfig, Call::LoadConfig)?;
        Ok(inner.config.clone())
    }

    async fn save_config(&self, doc: &ConfigDocument) -> Result<SaveOutcome, GatewayError> {
        let mut inner = self.inner.lock().await;
        inner.check(Operation::SaveConfig, Call::SaveConfig)?;
        if !inner.rejected_fields.is_empty() {
            return Ok(SaveOutcome::Invalid(inner.rejected_fields.clone()));
        }
        inner.config = doc.clone();
        Ok(SaveOutcome::Saved)
    }
}
