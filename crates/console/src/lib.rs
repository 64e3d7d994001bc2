//! Session controller for the Herald operator console.
//!
//! This crate ties the console engine together: one [`ConsoleSession`]
//! owns the two identity directory caches, the searchable identity
//! selectors, the mapping store with its reconciliation pass, the routing
//! tables, and the configuration-document boundary to the bot API.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use cache_store::CacheStore;
//! use console::ConsoleSession;
//! use gateway_client::{GatewayConfig, HttpGateway};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Arc::new(HttpGateway::new(GatewayConfig::from_env())?);
//! let store = CacheStore::open("cache", Duration::from_secs(30 * 60))?;
//!
//! let mut session = ConsoleSession::new(gateway, store);
//! session.start().await?;
//! # Ok(())
//! # }
//! ```

mod error;
pub mod fields;
mod routes;
mod selector;
mod session;

pub use error::{ConsoleError, Result};
pub use routes::RouteTable;
pub use selector::{IdentitySelector, SelectorEntry, SelectorStatus};
pub use session::{ConsoleSession, RouteKind};

// Re-export the pieces a console front end needs alongside the session.
pub use console_core::{
    ChannelInfo, ConfigDocument, DirectoryKind, Gateway, GatewayError, IdentityLink,
    IdentityRecord, LibraryInfo, SaveOutcome,
};
pub use directory_cache::{LoadOutcome, RefreshAll, RefreshReport, DIRECTORY_TTL};
pub use mapping_store::{LinkDisplay, PendingRemoval, ReconcileReport};
