//! Display derivation for identity links.

use console_core::IdentityLink;
use directory_cache::DirectoryCache;

/// What the console renders for one link. Never blank on either side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDisplay {
    /// Chat-platform side label.
    pub primary: String,
    /// Service side label.
    pub secondary: String,
    /// Avatar URL for the chat-platform side, when one is known.
    pub avatar_url: Option<String>,
}

/// Derive the labels for a link.
///
/// Precedence per side, freshest truth first: a record currently in the
/// directory cache, then the link's own stored display fields, then a
/// synthesized string embedding the raw id.
pub fn display_for(
    link: &IdentityLink,
    chat: &DirectoryCache,
    service: &DirectoryCache,
) -> LinkDisplay {
    let fresh_primary = chat.find(&link.primary_id);
    let fresh_secondary = service.find(&link.secondary_id);

    let primary = fresh_primary
        .map(|record| record.display_name.clone())
        .filter(|name| !name.is_empty())
        .or_else(|| nonempty(&link.primary_display_name))
        .or_else(|| nonempty(&link.primary_username))
        .unwrap_or_else(|| format!("Member ID: {}", link.primary_id));

    let secondary = fresh_secondary
        .map(|record| record.display_name.clone())
        .filter(|name| !name.is_empty())
        .or_else(|| nonempty(&link.secondary_display_name))
        .unwrap_or_else(|| format!("User ID: {}", link.secondary_id));

    let avatar_url = fresh_primary
        .and_then(|record| record.avatar_url.clone())
        .or_else(|| nonempty(&link.primary_avatar));

    LinkDisplay {
        primary,
        secondary,
        avatar_url,
    }
}

fn nonempty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(String::from)
}
