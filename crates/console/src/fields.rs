//! Config document fields the console owns.
//!
//! Structured values (routing maps, the identity-link list) travel as JSON
//! text inside string fields of the flat configuration document.

use tracing::warn;

use console_core::IdentityLink;

/// Field holding the fallback destination channel id.
pub const DEFAULT_CHANNEL_FIELD: &str = "default_channel_id";

/// Field holding the library → channel routing map.
pub const LIBRARY_ROUTES_FIELD: &str = "library_channels";

/// Field holding the event-category → channel routing map.
pub const EVENT_ROUTES_FIELD: &str = "event_channels";

/// Field holding the JSON-encoded identity-link list.
pub const IDENTITY_LINKS_FIELD: &str = "identity_links";

/// The fixed event categories routable next to libraries.
pub const EVENT_CATEGORIES: [&str; 2] = ["episodes", "seasons"];

/// Decode the identity-link list out of a config field. Absent or
/// malformed input reads as empty.
pub fn parse_links(raw: Option<&str>) -> Vec<IdentityLink> {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Vec::new(),
    };
    match serde_json::from_str(raw) {
        Ok(links) => links,
        Err(err) => {
            warn!(error = %err, "Malformed identity-link field, treating as empty");
            Vec::new()
        }
    }
}

/// Encode the identity-link list for its config field.
pub fn serialize_links(links: &[IdentityLink]) -> String {
    // Links are plain data; serialization cannot fail.
    serde_json::to_string(links).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link() -> IdentityLink {
        IdentityLink {
            primary_id: "100".to_string(),
            secondary_id: "7".to_string(),
            primary_username: None,
            primary_display_name: Some("Alice".to_string()),
            primary_avatar: None,
            secondary_display_name: None,
        }
    }

    #[test]
    fn test_links_round_trip() {
        let links = vec![link()];
        let raw = serialize_links(&links);
        assert_eq!(parse_links(Some(&raw)), links);
    }

    #[test]
    fn test_parse_links_absent_or_malformed_is_empty() {
        assert!(parse_links(None).is_empty());
        assert!(parse_links(Some("")).is_empty());
        assert!(parse_links(Some("{broken")).is_empty());
    }
}
