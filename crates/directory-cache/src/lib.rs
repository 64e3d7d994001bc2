//! TTL-bounded identity directory caches for the Herald console.
//!
//! Two instances exist per session: the chat-platform member directory and
//! the service user directory. Each holds the last fetched record list in
//! memory, persists it through [`cache_store::CacheStore`] with a 30-minute
//! freshness window, and is only ever replaced wholesale. A failed refresh
//! keeps serving the previous records; the error rides along in the
//! [`LoadOutcome`] so the caller can render list and error in one step.

mod error;
mod refresh;

pub use error::DirectoryError;
pub use refresh::{refresh_all, RefreshAll, RefreshReport};

use std::time::Duration;

use tracing::{debug, info, warn};

use cache_store::CacheStore;
use console_core::{DirectoryKind, Gateway, IdentityRecord};

/// Freshness window for persisted directory snapshots.
pub const DIRECTORY_TTL: Duration = Duration::from_secs(30 * 60);

/// Where a load outcome's records came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Already loaded this session; no fetch was performed.
    Memory,
    /// Adopted from the persisted snapshot.
    Store,
    /// Fetched live from the bot API.
    Fetched,
    /// The fetch failed; these are the previous records.
    Stale,
}

/// The result of a directory load: the records to render, where they came
/// from, and the fetch error when one occurred.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub records: Vec<IdentityRecord>,
    pub source: LoadSource,
    pub error: Option<DirectoryError>,
}

impl LoadOutcome {
    /// Whether the load ended with current data.
    pub fn is_fresh(&self) -> bool {
        self.error.is_none()
    }
}

/// One identity directory: in-memory records plus the persisted snapshot.
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    kind: DirectoryKind,
    store: CacheStore,
    records: Vec<IdentityRecord>,
    loaded: bool,
}

impl DirectoryCache {
    /// Create an empty cache over the given snapshot store.
    pub fn new(kind: DirectoryKind, store: CacheStore) -> Self {
        Self {
            kind,
            store,
            records: Vec::new(),
            loaded: false,
        }
    }

    /// Which directory this cache holds.
    pub fn kind(&self) -> DirectoryKind {
        self.kind
    }

    /// Whether any successful load (snapshot or live) has populated this
    /// cache. Casual UI interactions check this to avoid redundant fetches.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The current in-memory records.
    pub fn records(&self) -> &[IdentityRecord] {
        &self.records
    }

    /// Look up a record by id. Ids are compared as strings; service ids may
    /// be numeric upstream.
    pub fn find(&self, id: &str) -> Option<&IdentityRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Load the directory.
    ///
    /// Without `force`: an already-loaded cache answers from memory, and a
    /// fresh persisted snapshot answers without a fetch. Otherwise the
    /// directory is fetched live; on success the record list is replaced
    /// wholesale and persisted, on failure the previous records are kept
    /// and the error is carried in the outcome.
    pub async fn load(&mut self, gateway: &dyn Gateway, force: bool) -> LoadOutcome {
        if !force {
            if self.loaded {
                debug!(directory = %self.kind, "Directory already loaded, serving from memory");
                return self.outcome(LoadSource::Memory, None);
            }
            if let Some(records) = self.store.read::<Vec<IdentityRecord>>(self.kind.cache_key()) {
                debug!(
                    directory = %self.kind,
                    count = records.len(),
                    "Adopting persisted directory snapshot"
                );
                self.records = records;
                self.loaded = true;
                return self.outcome(LoadSource::Store, None);
            }
        }

        match gateway.fetch_directory_records(self.kind).await {
            Ok(records) => {
                info!(
                    directory = %self.kind,
                    count = records.len(),
                    "Directory refreshed"
                );
                self.records = records;
                self.loaded = true;
                self.store.write(self.kind.cache_key(), &self.records);
                self.outcome(LoadSource::Fetched, None)
            }
            Err(err) => {
                warn!(
                    directory = %self.kind,
                    error = %err,
                    "Directory fetch failed, keeping last-known records"
                );
                self.outcome(LoadSource::Stale, Some(DirectoryError::Fetch(err)))
            }
        }
    }

    fn outcome(&self, source: LoadSource, error: Option<DirectoryError>) -> LoadOutcome {
        LoadOutcome {
            records: self.records.clone(),
            source,
            error,
        }
    }
}
