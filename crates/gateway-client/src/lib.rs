//! HTTP client for the Herald bot API.
//!
//! [`HttpGateway`] implements the [`console_core::Gateway`] trait against
//! the bot's JSON API: identity directories, guild channels, identity
//! mappings, media libraries, and the flat configuration document.
//!
//! # Example
//!
//! ```no_run
//! use console_core::{DirectoryKind, Gateway};
//! use gateway_client::{GatewayConfig, HttpGateway};
//!
//! # async fn example() -> Result<(), console_core::GatewayError> {
//! let gateway = HttpGateway::new(GatewayConfig::new("http://127.0.0.1:5454"))?;
//! let members = gateway.fetch_directory_records(DirectoryKind::ChatMembers).await?;
//! println!("{} members", members.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod wire;

pub use client::HttpGateway;
pub use config::GatewayConfig;
