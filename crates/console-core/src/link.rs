//! The persisted identity link between the two directories.

use serde::{Deserialize, Serialize};

use crate::records::IdentityRecord;

/// A persisted association between one chat-platform identity and one
/// service identity, enriched with cached display metadata.
///
/// `primary_id` is unique across the stored list; the persistence boundary
/// enforces this with upsert-by-primary-id semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityLink {
    /// Chat-platform account id.
    pub primary_id: String,
    /// Service account id, compared as a string even when numeric upstream.
    pub secondary_id: String,
    /// Cached chat-platform username.
    #[serde(default)]
    pub primary_username: Option<String>,
    /// Cached chat-platform display name.
    #[serde(default)]
    pub primary_display_name: Option<String>,
    /// Cached chat-platform avatar URL.
    #[serde(default)]
    pub primary_avatar: Option<String>,
    /// Cached service display name.
    #[serde(default)]
    pub secondary_display_name: Option<String>,
}

impl IdentityLink {
    /// Build a link from one record out of each directory, carrying whatever
    /// display metadata each record currently holds.
    pub fn from_records(primary: &IdentityRecord, secondary: &IdentityRecord) -> Self {
        Self {
            primary_id: primary.id.clone(),
            secondary_id: secondary.id.clone(),
            primary_username: primary.secondary_label.clone(),
            primary_display_name: some_nonempty(&primary.display_name),
            primary_avatar: primary.avatar_url.clone(),
            secondary_display_name: some_nonempty(&secondary.display_name),
        }
    }
}

fn some_nonempty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_records_carries_metadata() {
        let primary = IdentityRecord {
            secondary_label: Some("alice#1234".to_string()),
            avatar_url: Some("https://cdn.example/a.png".to_string()),
            ..IdentityRecord::new("100", "Alice")
        };
        let secondary = IdentityRecord::new("7", "alice_media");

        let link = IdentityLink::from_records(&primary, &secondary);
        assert_eq!(link.primary_id, "100");
        assert_eq!(link.secondary_id, "7");
        assert_eq!(link.primary_username.as_deref(), Some("alice#1234"));
        assert_eq!(link.primary_display_name.as_deref(), Some("Alice"));
        assert_eq!(link.secondary_display_name.as_deref(), Some("alice_media"));
    }

    #[test]
    fn test_from_records_empty_names_become_none() {
        let primary = IdentityRecord::new("100", "");
        let secondary = IdentityRecord::new("7", "");

        let link = IdentityLink::from_records(&primary, &secondary);
        assert!(link.primary_display_name.is_none());
        assert!(link.secondary_display_name.is_none());
    }

    #[test]
    fn test_wire_format_camel_case() {
        let link = IdentityLink {
            primary_id: "100".to_string(),
            secondary_id: "7".to_string(),
            primary_username: None,
            primary_display_name: Some("Alice".to_string()),
            primary_avatar: None,
            secondary_display_name: None,
        };
        let json = serde_json::to_string(&link).unwrap();
        assert!(json.contains("\"primaryId\":\"100\""));
        assert!(json.contains("\"primaryDisplayName\":\"Alice\""));
    }
}
