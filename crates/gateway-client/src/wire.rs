//! Response shapes of the bot API.

use serde::Deserialize;

use console_core::{ChannelInfo, ConfigDocument, FieldError, IdentityLink, IdentityRecord, LibraryInfo};

/// A directory record listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsResponse {
    pub success: bool,
    #[serde(default)]
    pub records: Vec<IdentityRecord>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A guild channel listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelsResponse {
    pub success: bool,
    #[serde(default)]
    pub channels: Vec<ChannelInfo>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The stored mapping listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingsResponse {
    pub success: bool,
    #[serde(default)]
    pub mappings: Vec<IdentityLink>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The media library listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibrariesResponse {
    pub success: bool,
    #[serde(default)]
    pub libraries: Vec<LibraryInfo>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The configuration document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub success: bool,
    #[serde(default)]
    pub config: ConfigDocument,
    #[serde(default)]
    pub message: Option<String>,
}

/// Acknowledgement of a write, with per-field validation errors on a
/// rejected config save.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AckResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_response_decodes_camel_case() {
        let raw = r#"{
            "success": true,
            "records": [
                {"id": "100", "displayName": "Alice", "secondaryLabel": "alice#1234", "avatarUrl": null}
            ]
        }"#;
        let response: RecordsResponse = serde_json::from_str(raw).unwrap();
        assert!(response.success);
        assert_eq!(response.records.len(), 1);
        assert_eq!(response.records[0].display_name, "Alice");
        assert_eq!(response.records[0].secondary_label.as_deref(), Some("alice#1234"));
    }

    #[test]
    fn test_ack_response_with_field_errors() {
        let raw = r#"{
            "success": false,
            "errors": [{"field": "default_channel_id", "message": "unknown channel"}]
        }"#;
        let response: AckResponse = serde_json::from_str(raw).unwrap();
        assert!(!response.success);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].field, "default_channel_id");
    }

    #[test]
    fn test_config_response_flat_document() {
        let raw = r#"{"success": true, "config": {"default_channel_id": "C1"}}"#;
        let response: ConfigResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.config.get("default_channel_id"), Some("C1"));
    }

    #[test]
    fn test_missing_collections_default_empty() {
        let raw = r#"{"success": false, "message": "down for maintenance"}"#;
        let response: LibrariesResponse = serde_json::from_str(raw).unwrap();
        assert!(response.libraries.is_empty());
        assert_eq!(response.message.as_deref(), Some("down for maintenance"));
    }
}
