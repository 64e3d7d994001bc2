//! The session-scoped console state object.
//!
//! All mutable console state lives here and is owned by one
//! [`ConsoleSession`]: the two directory caches, the two identity
//! selectors, the mapping store, the routing tables, and the loaded
//! configuration document. Subcomponents receive state explicitly; nothing
//! reads from ambient scope. In-flight network actions disable only their
//! own trigger (a busy flag per action), never unrelated controls.

use std::sync::Arc;

use tracing::{info, warn};

use cache_store::CacheStore;
use console_core::{
    ChannelInfo, ConfigDocument, DirectoryKind, Gateway, IdentityRecord, LibraryInfo, SaveOutcome,
};
use directory_cache::{refresh_all, DirectoryCache, LoadOutcome, RefreshAll};
use mapping_store::{display_for, LinkDisplay, MappingStore, PendingRemoval, ReconcileReport};

use crate::error::{ConsoleError, Result};
use crate::fields::{
    self, DEFAULT_CHANNEL_FIELD, EVENT_CATEGORIES, EVENT_ROUTES_FIELD, IDENTITY_LINKS_FIELD,
    LIBRARY_ROUTES_FIELD,
};
use crate::routes::RouteTable;
use crate::selector::{annotate_primary, annotate_secondary, IdentitySelector, SelectorEntry};

/// Which routing table an operator action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Per-library routing.
    Libraries,
    /// Fixed event categories (episodes, seasons).
    Events,
}

/// The operator console session.
pub struct ConsoleSession {
    gateway: Arc<dyn Gateway>,
    chat: DirectoryCache,
    service: DirectoryCache,
    chat_selector: IdentitySelector,
    service_selector: IdentitySelector,
    mappings: MappingStore,
    libraries: Vec<LibraryInfo>,
    channels: Vec<ChannelInfo>,
    config: ConfigDocument,
    library_routes: RouteTable,
    event_routes: RouteTable,
    refresh_in_flight: bool,
    reconcile_in_flight: bool,
}

impl ConsoleSession {
    /// Create a session over a gateway and a snapshot store.
    pub fn new(gateway: Arc<dyn Gateway>, store: CacheStore) -> Self {
        let empty = ConfigDocument::new();
        Self {
            chat: DirectoryCache::new(DirectoryKind::ChatMembers, store.clone()),
            service: DirectoryCache::new(DirectoryKind::ServiceUsers, store),
            chat_selector: IdentitySelector::new(),
            service_selector: IdentitySelector::new(),
            mappings: MappingStore::new(),
            libraries: Vec::new(),
            channels: Vec::new(),
            library_routes: RouteTable::load(LIBRARY_ROUTES_FIELD, &empty, "", Vec::new()),
            event_routes: RouteTable::load(EVENT_ROUTES_FIELD, &empty, "", event_categories()),
            config: empty,
            refresh_in_flight: false,
            reconcile_in_flight: false,
            gateway,
        }
    }

    /// Load the configuration, library list, and stored links, and build
    /// the routing tables from them.
    pub async fn start(&mut self) -> Result<()> {
        let gateway = Arc::clone(&self.gateway);
        self.config = gateway.load_config().await?;
        self.libraries = gateway.load_libraries().await?;
        self.mappings.load_all(gateway.as_ref()).await?;
        self.rebuild_route_tables();
        info!(
            libraries = self.libraries.len(),
            links = self.mappings.len(),
            "Console session started"
        );
        Ok(())
    }

    /// The fallback destination channel.
    pub fn default_channel(&self) -> &str {
        self.config.get(DEFAULT_CHANNEL_FIELD).unwrap_or("")
    }

    /// Point the fallback destination at another channel.
    pub fn set_default_channel(&mut self, channel_id: impl Into<String>) {
        self.config.set(DEFAULT_CHANNEL_FIELD, channel_id.into());
    }

    /// Known media libraries.
    pub fn libraries(&self) -> &[LibraryInfo] {
        &self.libraries
    }

    /// The stored identity links.
    pub fn mappings(&self) -> &MappingStore {
        &self.mappings
    }

    /// The loaded configuration document.
    pub fn config(&self) -> &ConfigDocument {
        &self.config
    }

    // --- directories ---

    /// Refresh both directories concurrently. A second trigger while one
    /// refresh is in flight is refused; the initiating control stays
    /// disabled for the duration instead of cancelling anything.
    pub async fn refresh_directories(&mut self) -> Result<RefreshAll> {
        if self.refresh_in_flight {
            return Err(ConsoleError::Busy("directory refresh"));
        }
        self.refresh_in_flight = true;
        let gateway = Arc::clone(&self.gateway);
        let result = refresh_all(&mut self.chat, &mut self.service, gateway.as_ref()).await;
        self.refresh_in_flight = false;
        Ok(result)
    }

    /// One directory's cache, read-only.
    pub fn directory(&self, kind: DirectoryKind) -> &DirectoryCache {
        self.cache(kind)
    }

    // --- selectors ---

    /// Open a selector. When this is the first need for its directory, the
    /// load runs and its outcome (records plus any fetch error, one
    /// atomic step for the renderer) is returned.
    pub async fn activate_selector(&mut self, kind: DirectoryKind) -> Result<Option<LoadOutcome>> {
        let opened = self.selector_mut(kind).activate();
        if opened && !self.cache(kind).is_loaded() {
            let gateway = Arc::clone(&self.gateway);
            let outcome = self.cache_mut(kind).load(gateway.as_ref(), false).await;
            return Ok(Some(outcome));
        }
        Ok(None)
    }

    /// Update a selector's search query.
    pub fn search(&mut self, kind: DirectoryKind, query: impl Into<String>) {
        self.selector_mut(kind).input(query);
    }

    /// Close a selector without selecting.
    pub fn dismiss_selector(&mut self, kind: DirectoryKind) {
        self.selector_mut(kind).dismiss();
    }

    /// One selector, read-only.
    pub fn selector(&self, kind: DirectoryKind) -> &IdentitySelector {
        match kind {
            DirectoryKind::ChatMembers => &self.chat_selector,
            DirectoryKind::ServiceUsers => &self.service_selector,
        }
    }

    /// The records a selector currently shows, each flagged when already
    /// linked.
    pub fn visible_entries(&self, kind: DirectoryKind) -> Vec<SelectorEntry<'_>> {
        let filtered = self.selector(kind).filter(self.cache(kind).records());
        match kind {
            DirectoryKind::ChatMembers => annotate_primary(filtered, &self.mappings),
            DirectoryKind::ServiceUsers => annotate_secondary(filtered, &self.mappings),
        }
    }

    /// Select a record by id out of the directory cache.
    pub fn choose_identity(&mut self, kind: DirectoryKind, id: &str) -> Result<()> {
        let record = self
            .cache(kind)
            .find(id)
            .cloned()
            .ok_or_else(|| ConsoleError::UnknownRecord {
                directory: kind,
                id: id.to_string(),
            })?;
        self.selector_mut(kind).choose(record);
        Ok(())
    }

    // --- links ---

    /// Link the two selected identities. Requires one selection on each
    /// side; a successful submit consumes both.
    pub async fn submit_link(&mut self) -> Result<()> {
        let primary = self
            .chat_selector
            .selection()
            .cloned()
            .ok_or(ConsoleError::IncompleteSelection)?;
        let secondary = self
            .service_selector
            .selection()
            .cloned()
            .ok_or(ConsoleError::IncompleteSelection)?;

        let gateway = Arc::clone(&self.gateway);
        self.mappings
            .add(gateway.as_ref(), &primary, &secondary)
            .await?;
        self.chat_selector.take_selection();
        self.service_selector.take_selection();
        Ok(())
    }

    /// Begin removing a link; the returned ticket is the confirmation
    /// step.
    pub fn request_unlink(&self, primary_id: &str) -> Option<PendingRemoval> {
        self.mappings.request_remove(primary_id)
    }

    /// Complete a confirmed removal.
    pub async fn confirm_unlink(&mut self, pending: PendingRemoval) -> Result<()> {
        let gateway = Arc::clone(&self.gateway);
        self.mappings
            .confirm_remove(gateway.as_ref(), pending)
            .await?;
        Ok(())
    }

    /// Repair links with missing display metadata. Runs only once both
    /// directories are loaded; reports `SkippedNotReady` otherwise.
    pub async fn reconcile(&mut self) -> Result<ReconcileReport> {
        if self.reconcile_in_flight {
            return Err(ConsoleError::Busy("reconciliation"));
        }
        self.reconcile_in_flight = true;
        let gateway = Arc::clone(&self.gateway);
        let result = self
            .mappings
            .reconcile(gateway.as_ref(), &self.chat, &self.service)
            .await;
        self.reconcile_in_flight = false;
        Ok(result?)
    }

    /// Render labels for every stored link, freshest truth first.
    pub fn link_displays(&self) -> Vec<LinkDisplay> {
        self.mappings
            .links()
            .iter()
            .map(|link| display_for(link, &self.chat, &self.service))
            .collect()
    }

    // --- channels & routing ---

    /// Load the channel list for a guild.
    pub async fn load_channels(&mut self, guild_id: &str) -> Result<&[ChannelInfo]> {
        let gateway = Arc::clone(&self.gateway);
        self.channels = gateway.fetch_channels_for_guild(guild_id).await?;
        Ok(&self.channels)
    }

    /// The channels notifications can be routed to.
    pub fn text_channels(&self) -> impl Iterator<Item = &ChannelInfo> {
        self.channels.iter().filter(|channel| channel.is_text())
    }

    /// One routing table, read-only.
    pub fn routes(&self, kind: RouteKind) -> &RouteTable {
        match kind {
            RouteKind::Libraries => &self.library_routes,
            RouteKind::Events => &self.event_routes,
        }
    }

    /// Enable or disable a routing category.
    pub fn toggle_route(&mut self, kind: RouteKind, category: &str, enabled: bool) {
        self.routes_mut(kind).toggle(category, enabled);
    }

    /// Point an enabled routing category at a channel. Returns `false`
    /// when the category is disabled.
    pub fn set_route_channel(&mut self, kind: RouteKind, category: &str, channel_id: &str) -> bool {
        self.routes_mut(kind).set_channel(category, channel_id)
    }

    // --- persistence ---

    /// Save the configuration. The outgoing document is built fully in
    /// memory before the call; on a per-field rejection the local state is
    /// kept so the operator can correct and resubmit.
    pub async fn save(&mut self) -> Result<SaveOutcome> {
        let mut doc = self.config.clone();
        self.library_routes.write_to(&mut doc);
        self.event_routes.write_to(&mut doc);
        doc.set(
            IDENTITY_LINKS_FIELD,
            fields::serialize_links(self.mappings.links()),
        );

        let gateway = Arc::clone(&self.gateway);
        let outcome = gateway.save_config(&doc).await?;
        match &outcome {
            SaveOutcome::Saved => {
                info!("Configuration saved");
                self.config = doc;
            }
            SaveOutcome::Invalid(errors) => {
                warn!(fields = errors.len(), "Configuration save rejected");
            }
        }
        Ok(outcome)
    }

    // --- internals ---

    fn rebuild_route_tables(&mut self) {
        let default_channel = self.default_channel().to_string();
        let library_ids: Vec<String> = self
            .libraries
            .iter()
            .map(|library| library.id.clone())
            .collect();
        self.library_routes = RouteTable::load(
            LIBRARY_ROUTES_FIELD,
            &self.config,
            &default_channel,
            library_ids,
        );
        self.event_routes = RouteTable::load(
            EVENT_ROUTES_FIELD,
            &self.config,
            &default_channel,
            event_categories(),
        );
    }

    fn cache(&self, kind: DirectoryKind) -> &DirectoryCache {
        match kind {
            DirectoryKind::ChatMembers => &self.chat,
            DirectoryKind::ServiceUsers => &self.service,
        }
    }

    fn cache_mut(&mut self, kind: DirectoryKind) -> &mut DirectoryCache {
        match kind {
            DirectoryKind::ChatMembers => &mut self.chat,
            DirectoryKind::ServiceUsers => &mut self.service,
        }
    }

    fn selector_mut(&mut self, kind: DirectoryKind) -> &mut IdentitySelector {
        match kind {
            DirectoryKind::ChatMembers => &mut self.chat_selector,
            DirectoryKind::ServiceUsers => &mut self.service_selector,
        }
    }

    fn routes_mut(&mut self, kind: RouteKind) -> &mut RouteTable {
        match kind {
            RouteKind::Libraries => &mut self.library_routes,
            RouteKind::Events => &mut self.event_routes,
        }
    }

    /// Select a record without going through a directory cache lookup.
    pub fn choose_record(&mut self, kind: DirectoryKind, record: IdentityRecord) {
        self.selector_mut(kind).choose(record);
    }
}

fn event_categories() -> Vec<String> {
    EVENT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}
