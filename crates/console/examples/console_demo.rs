//! Console walkthrough example.
//!
//! Drives a full operator flow against the in-memory mock gateway:
//! load the session, refresh both directories, link two identities,
//! route a library to a channel, and save the configuration.
//!
//! Run with: cargo run -p console --example console_demo

use std::sync::Arc;

use tracing::info;

use cache_store::CacheStore;
use console::{
    ConsoleSession, DirectoryKind, IdentityRecord, RouteKind, SaveOutcome, DIRECTORY_TTL,
};
use console_core::{ChannelInfo, ConfigDocument, LibraryInfo};
use mock_gateway::MockGateway;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut config = ConfigDocument::new();
    config.set("default_channel_id", "C1");

    let gateway = Arc::new(
        MockGateway::new()
            .with_members(vec![
                IdentityRecord {
                    secondary_label: Some("alice#1234".to_string()),
                    ..IdentityRecord::new("100", "Alice")
                },
                IdentityRecord::new("200", "Bob"),
            ])
            .with_users(vec![IdentityRecord::new("7", "alice_media")])
            .with_libraries(vec![
                LibraryInfo {
                    id: "libA".to_string(),
                    name: "Movies".to_string(),
                },
                LibraryInfo {
                    id: "libB".to_string(),
                    name: "Shows".to_string(),
                },
            ])
            .with_channels(vec![ChannelInfo {
                id: "C2".to_string(),
                name: "media-news".to_string(),
                kind: "text".to_string(),
            }])
            .with_config(config),
    );

    let cache_dir = std::env::temp_dir().join("herald-console-demo");
    let store = CacheStore::open(cache_dir, DIRECTORY_TTL)?;

    let mut session = ConsoleSession::new(Arc::clone(&gateway) as Arc<dyn console::Gateway>, store);
    session.start().await?;

    let refresh = session.refresh_directories().await?;
    info!(report = ?refresh.report(), "Directories refreshed");

    let report = session.reconcile().await?;
    info!(report = ?report, "Reconciliation pass finished");

    // Link Alice to her media account.
    session.activate_selector(DirectoryKind::ChatMembers).await?;
    session.search(DirectoryKind::ChatMembers, "ali");
    session.choose_identity(DirectoryKind::ChatMembers, "100")?;
    session.activate_selector(DirectoryKind::ServiceUsers).await?;
    session.choose_identity(DirectoryKind::ServiceUsers, "7")?;
    session.submit_link().await?;

    for link_display in session.link_displays() {
        info!(primary = %link_display.primary, secondary = %link_display.secondary, "Linked");
    }

    // Route the Movies library to the news channel, drop Shows.
    session.load_channels("guild-1").await?;
    session.toggle_route(RouteKind::Libraries, "libB", false);
    session.set_route_channel(RouteKind::Libraries, "libA", "C2");

    match session.save().await? {
        SaveOutcome::Saved => info!("Configuration saved"),
        SaveOutcome::Invalid(errors) => {
            for error in errors {
                info!(field = %error.field, message = %error.message, "Rejected");
            }
        }
    }

    Ok(())
}
