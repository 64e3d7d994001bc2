//! Directory records and lookup metadata.

use serde::{Deserialize, Serialize};

/// One of the two external identity directories the console consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectoryKind {
    /// Members of the chat platform guild the bot posts into.
    ChatMembers,
    /// User accounts on the media/request service the bot watches.
    ServiceUsers,
}

impl DirectoryKind {
    /// Stable key used for the persisted directory snapshot.
    pub fn cache_key(self) -> &'static str {
        match self {
            DirectoryKind::ChatMembers => "chat_members",
            DirectoryKind::ServiceUsers => "service_users",
        }
    }

    /// Human-readable label for operator-facing reporting.
    pub fn label(self) -> &'static str {
        match self {
            DirectoryKind::ChatMembers => "chat members",
            DirectoryKind::ServiceUsers => "service users",
        }
    }
}

impl std::fmt::Display for DirectoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single entry in an identity directory.
///
/// Records are immutable once fetched; a directory is only ever replaced
/// wholesale by a fresh fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    /// Directory-assigned identifier. Service ids may be numeric upstream
    /// and are always compared as strings.
    pub id: String,
    /// Primary display name.
    pub display_name: String,
    /// Username or email, when the directory exposes one.
    #[serde(default)]
    pub secondary_label: Option<String>,
    /// Avatar URL, when the directory exposes one.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl IdentityRecord {
    /// Create a record with just an id and display name.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            secondary_label: None,
            avatar_url: None,
        }
    }

    /// Case-insensitive substring match against the display name and
    /// secondary label.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        if self.display_name.to_lowercase().contains(&needle) {
            return true;
        }
        self.secondary_label
            .as_deref()
            .is_some_and(|label| label.to_lowercase().contains(&needle))
    }
}

/// A destination channel on the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    /// Channel identifier.
    pub id: String,
    /// Channel name.
    pub name: String,
    /// Channel kind as reported by the platform (e.g., "text", "voice").
    #[serde(default)]
    pub kind: String,
}

impl ChannelInfo {
    /// Whether notifications can be routed to this channel.
    pub fn is_text(&self) -> bool {
        self.kind.is_empty() || self.kind == "text"
    }
}

/// A content library on the media server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryInfo {
    /// Library identifier.
    pub id: String,
    /// Library name.
    pub name: String,
}
