//! Identity link store and metadata reconciliation for the Herald console.
//!
//! The [`MappingStore`] holds the session's identity links: persisted
//! associations between a chat-platform account and a service account,
//! enriched with cached display metadata. The bot API is the source of
//! truth; the store is what the console renders and what the
//! reconciliation pass scans for links whose display metadata went
//! missing (e.g., created before the directory was reachable).
//!
//! Removal is two-phase by construction: [`MappingStore::request_remove`]
//! hands out a [`PendingRemoval`] ticket that
//! [`MappingStore::confirm_remove`] consumes by value, so a delete cannot
//! be expressed without the confirmation step and cannot be submitted
//! twice.

mod display;
mod error;

pub use display::{display_for, LinkDisplay};
pub use error::{MappingError, Result};

use tracing::{debug, info, warn};

use console_core::{Gateway, IdentityLink, IdentityRecord};
use directory_cache::DirectoryCache;

/// Whether a link is missing display metadata and should be repaired by
/// the next reconciliation pass. Not an error: a recoverable data-quality
/// condition.
pub fn needs_reconciliation(link: &IdentityLink) -> bool {
    is_blank(&link.primary_display_name) || is_blank(&link.secondary_display_name)
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileReport {
    /// One or both directory caches were not loaded yet; nothing was
    /// touched.
    SkippedNotReady,
    /// The pass ran: `corrected` links were pushed, `failed` pushes were
    /// dropped (transient, retried on a later pass).
    Completed { corrected: usize, failed: usize },
}

/// A confirmation ticket for removing one link.
///
/// Holding a ticket is the only way to delete; it is consumed whether the
/// delete succeeds or not, so a double submit cannot happen.
#[derive(Debug)]
#[must_use = "a removal only happens once the ticket is confirmed"]
pub struct PendingRemoval {
    primary_id: String,
}

impl PendingRemoval {
    /// The id the confirmation dialog shows.
    pub fn primary_id(&self) -> &str {
        &self.primary_id
    }
}

/// The in-memory list of identity links.
#[derive(Debug, Default)]
pub struct MappingStore {
    links: Vec<IdentityLink>,
}

impl MappingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current links.
    pub fn links(&self) -> &[IdentityLink] {
        &self.links
    }

    /// Number of links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the store holds no links.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Look up a link by its chat-platform id.
    pub fn find(&self, primary_id: &str) -> Option<&IdentityLink> {
        self.links.iter().find(|link| link.primary_id == primary_id)
    }

    /// Whether a chat-platform id is already linked. Selector hint only,
    /// non-authoritative.
    pub fn is_primary_linked(&self, id: &str) -> bool {
        self.links.iter().any(|link| link.primary_id == id)
    }

    /// Whether a service id is already linked. Selector hint only,
    /// non-authoritative.
    pub fn is_secondary_linked(&self, id: &str) -> bool {
        self.links.iter().any(|link| link.secondary_id == id)
    }

    /// Replace the store from the bot API. No local derivation.
    pub async fn load_all(&mut self, gateway: &dyn Gateway) -> Result<()> {
        let links = gateway.load_mappings().await?;
        debug!(count = links.len(), "Loaded identity links");
        self.links = links;
        Ok(())
    }

    /// Link one record from each directory.
    ///
    /// The link is built fully in memory from whatever display metadata the
    /// records hold (nulls allowed), pushed as an upsert, and only then
    /// mirrored locally. The server is the final authority on uniqueness
    /// by primary id.
    pub async fn add(
        &mut self,
        gateway: &dyn Gateway,
        primary: &IdentityRecord,
        secondary: &IdentityRecord,
    ) -> Result<()> {
        let link = IdentityLink::from_records(primary, secondary);
        gateway.upsert_mapping(&link).await?;
        info!(
            primary_id = %link.primary_id,
            secondary_id = %link.secondary_id,
            "Identity link added"
        );
        self.apply_upsert(link);
        Ok(())
    }

    /// Begin removing a link. Returns `None` when no such link exists.
    pub fn request_remove(&self, primary_id: &str) -> Option<PendingRemoval> {
        self.find(primary_id).map(|link| PendingRemoval {
            primary_id: link.primary_id.clone(),
        })
    }

    /// Complete a confirmed removal.
    pub async fn confirm_remove(
        &mut self,
        gateway: &dyn Gateway,
        pending: PendingRemoval,
    ) -> Result<()> {
        gateway.delete_mapping(&pending.primary_id).await?;
        self.links
            .retain(|link| link.primary_id != pending.primary_id);
        info!(primary_id = %pending.primary_id, "Identity link removed");
        Ok(())
    }

    /// Repair links with missing display metadata.
    ///
    /// Precondition: both directory caches are loaded; otherwise nothing is
    /// touched and the pass reports [`ReconcileReport::SkippedNotReady`].
    /// For each incomplete link, both ids are looked up (as strings) in
    /// their directories; when a lookup lands, a corrected link is built
    /// with fresh directory values taking precedence over stored ones, and
    /// pushed as an upsert. Pushes that would not change the stored link
    /// are skipped, which is what makes a repeat pass over unchanged
    /// directories a no-op. After any pushes, the whole list is reloaded
    /// from the API so the store reflects server-confirmed state.
    pub async fn reconcile(
        &mut self,
        gateway: &dyn Gateway,
        chat: &DirectoryCache,
        service: &DirectoryCache,
    ) -> Result<ReconcileReport> {
        if !chat.is_loaded() || !service.is_loaded() {
            debug!("Directory caches not loaded, reconciliation skipped");
            return Ok(ReconcileReport::SkippedNotReady);
        }

        let mut corrected = 0usize;
        let mut failed = 0usize;

        for link in &self.links {
            if !needs_reconciliation(link) {
                continue;
            }

            let primary = chat.find(&link.primary_id);
            let secondary = service.find(&link.secondary_id);
            if primary.is_none() && secondary.is_none() {
                debug!(
                    primary_id = %link.primary_id,
                    "No directory record found for incomplete link"
                );
                continue;
            }

            let repaired = corrected_link(link, primary, secondary);
            if repaired == *link {
                continue;
            }

            match gateway.upsert_mapping(&repaired).await {
                Ok(()) => {
                    info!(primary_id = %repaired.primary_id, "Link metadata reconciled");
                    corrected += 1;
                }
                Err(err) => {
                    warn!(
                        primary_id = %repaired.primary_id,
                        error = %err,
                        "Reconciliation push failed, will retry on a later pass"
                    );
                    failed += 1;
                }
            }
        }

        if corrected > 0 || failed > 0 {
            // Server-confirmed state, not local edits.
            self.load_all(gateway).await?;
        }

        Ok(ReconcileReport::Completed { corrected, failed })
    }

    fn apply_upsert(&mut self, link: IdentityLink) {
        match self
            .links
            .iter_mut()
            .find(|existing| existing.primary_id == link.primary_id)
        {
            Some(existing) => *existing = link,
            None => self.links.push(link),
        }
    }
}

/// Build the repaired link: per field, a fresh directory value wins over
/// the stored one, and the stored value stands when the directory has
/// nothing fresh. Never regresses a field to null.
fn corrected_link(
    link: &IdentityLink,
    primary: Option<&IdentityRecord>,
    secondary: Option<&IdentityRecord>,
) -> IdentityLink {
    IdentityLink {
        primary_id: link.primary_id.clone(),
        secondary_id: link.secondary_id.clone(),
        primary_username: prefer_fresh(
            primary.and_then(|r| r.secondary_label.clone()),
            &link.primary_username,
        ),
        primary_display_name: prefer_fresh(
            primary.map(|r| r.display_name.clone()),
            &link.primary_display_name,
        ),
        primary_avatar: prefer_fresh(
            primary.and_then(|r| r.avatar_url.clone()),
            &link.primary_avatar,
        ),
        secondary_display_name: prefer_fresh(
            secondary.map(|r| r.display_name.clone()),
            &link.secondary_display_name,
        ),
    }
}

fn prefer_fresh(fresh: Option<String>, stored: &Option<String>) -> Option<String> {
    match fresh {
        Some(value) if !value.is_empty() => Some(value),
        _ => stored.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use cache_store::CacheStore;
    use console_core::DirectoryKind;
    use directory_cache::DIRECTORY_TTL;
    use mock_gateway::{MockGateway, Operation};

    fn record(id: &str, name: &str) -> IdentityRecord {
        IdentityRecord::new(id, name)
    }

    fn bare_link(primary_id: &str, secondary_id: &str) -> IdentityLink {
        IdentityLink {
            primary_id: primary_id.to_string(),
            secondary_id: secondary_id.to_string(),
            primary_username: None,
            primary_display_name: None,
            primary_avatar: None,
            secondary_display_name: None,
        }
    }

    async fn loaded_caches(
        gateway: &MockGateway,
        dir: &tempfile::TempDir,
    ) -> (DirectoryCache, DirectoryCache) {
        let store = CacheStore::open(dir.path().join("cache"), DIRECTORY_TTL).unwrap();
        let mut chat = DirectoryCache::new(DirectoryKind::ChatMembers, store.clone());
        let mut service = DirectoryCache::new(DirectoryKind::ServiceUsers, store);
        chat.load(gateway, true).await;
        service.load(gateway, true).await;
        (chat, service)
    }

    #[test]
    fn test_needs_reconciliation_on_missing_or_empty_names() {
        let mut link = bare_link("100", "7");
        assert!(needs_reconciliation(&link));

        link.primary_display_name = Some("Alice".to_string());
        assert!(needs_reconciliation(&link));

        link.secondary_display_name = Some(String::new());
        assert!(needs_reconciliation(&link));

        link.secondary_display_name = Some("alice_media".to_string());
        assert!(!needs_reconciliation(&link));
    }

    #[tokio::test]
    async fn test_add_then_remove_end_to_end() {
        let gateway = MockGateway::new();
        let mut store = MappingStore::new();

        store
            .add(&gateway, &record("100", "Alice"), &record("7", "alice_media"))
            .await
            .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.links()[0].primary_id, "100");
        assert_eq!(gateway.stored_mappings().await.len(), 1);

        let pending = store.request_remove("100").unwrap();
        store.confirm_remove(&gateway, pending).await.unwrap();
        assert!(store.is_empty());
        assert!(gateway.stored_mappings().await.is_empty());
    }

    #[tokio::test]
    async fn test_request_remove_unknown_id_yields_no_ticket() {
        let store = MappingStore::new();
        assert!(store.request_remove("nope").is_none());
    }

    #[tokio::test]
    async fn test_add_same_primary_replaces_keeping_ids_unique() {
        let gateway = MockGateway::new();
        let mut store = MappingStore::new();

        store
            .add(&gateway, &record("100", "Alice"), &record("7", "alice_media"))
            .await
            .unwrap();
        store
            .add(&gateway, &record("100", "Alice"), &record("8", "other_account"))
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.links()[0].secondary_id, "8");
        assert_eq!(gateway.stored_mappings().await.len(), 1);
    }

    #[tokio::test]
    async fn test_reconcile_requires_loaded_caches() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = MockGateway::new().with_mappings(vec![bare_link("100", "7")]);
        let store_backing = CacheStore::open(dir.path().join("cache"), DIRECTORY_TTL).unwrap();
        let chat = DirectoryCache::new(DirectoryKind::ChatMembers, store_backing.clone());
        let service = DirectoryCache::new(DirectoryKind::ServiceUsers, store_backing);

        let mut store = MappingStore::new();
        store.load_all(&gateway).await.unwrap();
        gateway.clear_calls().await;

        let report = store.reconcile(&gateway, &chat, &service).await.unwrap();
        assert_eq!(report, ReconcileReport::SkippedNotReady);
        assert!(gateway.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_fills_missing_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = MockGateway::new()
            .with_members(vec![IdentityRecord {
                secondary_label: Some("alice#1234".to_string()),
                avatar_url: Some("https://cdn.example/a.png".to_string()),
                ..record("100", "Alice")
            }])
            .with_users(vec![record("7", "alice_media")])
            .with_mappings(vec![bare_link("100", "7")]);
        let (chat, service) = loaded_caches(&gateway, &dir).await;

        let mut store = MappingStore::new();
        store.load_all(&gateway).await.unwrap();

        let report = store.reconcile(&gateway, &chat, &service).await.unwrap();
        assert_eq!(
            report,
            ReconcileReport::Completed {
                corrected: 1,
                failed: 0
            }
        );

        let link = store.find("100").unwrap();
        assert_eq!(link.primary_display_name.as_deref(), Some("Alice"));
        assert_eq!(link.primary_username.as_deref(), Some("alice#1234"));
        assert_eq!(link.secondary_display_name.as_deref(), Some("alice_media"));
    }

    #[tokio::test]
    async fn test_reconcile_is_idempotent_on_unchanged_directories() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = MockGateway::new()
            .with_members(vec![record("100", "Alice")])
            .with_users(vec![record("7", "alice_media")])
            .with_mappings(vec![bare_link("100", "7")]);
        let (chat, service) = loaded_caches(&gateway, &dir).await;

        let mut store = MappingStore::new();
        store.load_all(&gateway).await.unwrap();

        store.reconcile(&gateway, &chat, &service).await.unwrap();
        let calls_after_first = gateway.calls().await.len();

        let report = store.reconcile(&gateway, &chat, &service).await.unwrap();
        assert_eq!(
            report,
            ReconcileReport::Completed {
                corrected: 0,
                failed: 0
            }
        );
        assert_eq!(gateway.calls().await.len(), calls_after_first);
    }

    #[tokio::test]
    async fn test_reconcile_half_resolvable_link_settles() {
        let dir = tempfile::tempdir().unwrap();
        // Only the chat side of the link exists in a directory.
        let gateway = MockGateway::new()
            .with_members(vec![record("100", "Alice")])
            .with_users(vec![record("9", "someone_else")])
            .with_mappings(vec![bare_link("100", "7")]);
        let (chat, service) = loaded_caches(&gateway, &dir).await;

        let mut store = MappingStore::new();
        store.load_all(&gateway).await.unwrap();

        let report = store.reconcile(&gateway, &chat, &service).await.unwrap();
        assert_eq!(
            report,
            ReconcileReport::Completed {
                corrected: 1,
                failed: 0
            }
        );
        let link = store.find("100").unwrap();
        assert_eq!(link.primary_display_name.as_deref(), Some("Alice"));
        assert!(link.secondary_display_name.is_none());

        // Still incomplete, but there is nothing new to push: a repeat pass
        // performs no API calls.
        let calls_before = gateway.calls().await.len();
        store.reconcile(&gateway, &chat, &service).await.unwrap();
        assert_eq!(gateway.calls().await.len(), calls_before);
    }

    #[tokio::test]
    async fn test_reconcile_push_failure_is_counted_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = MockGateway::new()
            .with_members(vec![record("100", "Alice")])
            .with_users(vec![record("7", "alice_media")])
            .with_mappings(vec![bare_link("100", "7")]);
        let (chat, service) = loaded_caches(&gateway, &dir).await;

        let mut store = MappingStore::new();
        store.load_all(&gateway).await.unwrap();
        gateway.set_failing(Operation::UpsertMapping, true).await;

        let report = store.reconcile(&gateway, &chat, &service).await.unwrap();
        assert_eq!(
            report,
            ReconcileReport::Completed {
                corrected: 0,
                failed: 1
            }
        );

        // The stored link is untouched; the pass retries later.
        let link = store.find("100").unwrap();
        assert!(link.primary_display_name.is_none());
    }

    #[tokio::test]
    async fn test_reconcile_preserves_stored_values_over_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let stored = IdentityLink {
            primary_username: Some("alice#1234".to_string()),
            ..bare_link("100", "7")
        };
        // The fresh chat record has a display name but no username; the
        // stored username must survive.
        let gateway = MockGateway::new()
            .with_members(vec![record("100", "Alice")])
            .with_users(vec![record("7", "alice_media")])
            .with_mappings(vec![stored]);
        let (chat, service) = loaded_caches(&gateway, &dir).await;

        let mut store = MappingStore::new();
        store.load_all(&gateway).await.unwrap();
        store.reconcile(&gateway, &chat, &service).await.unwrap();

        let link = store.find("100").unwrap();
        assert_eq!(link.primary_username.as_deref(), Some("alice#1234"));
        assert_eq!(link.primary_display_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_selector_hint_membership() {
        let gateway = MockGateway::new();
        let mut store = MappingStore::new();
        store
            .add(&gateway, &record("100", "Alice"), &record("7", "alice_media"))
            .await
            .unwrap();

        assert!(store.is_primary_linked("100"));
        assert!(store.is_secondary_linked("7"));
        assert!(!store.is_primary_linked("7"));
        assert!(!store.is_secondary_linked("100"));
    }
}
