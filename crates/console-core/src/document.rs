//! The flat configuration document persisted by the bot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A flat key/value configuration record.
///
/// Structured fields (routing maps, the identity-link list) travel as
/// JSON-encoded text inside string values of this document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    fields: BTreeMap<String, String>,
}

impl ConfigDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Set a field value, replacing any previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Remove a field.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.fields.remove(key)
    }

    /// Iterate over all fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields present.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, String)> for ConfigDocument {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut doc = ConfigDocument::new();
        doc.set("default_channel_id", "C1");
        assert_eq!(doc.get("default_channel_id"), Some("C1"));

        doc.set("default_channel_id", "C2");
        assert_eq!(doc.get("default_channel_id"), Some("C2"));

        assert_eq!(doc.remove("default_channel_id"), Some("C2".to_string()));
        assert_eq!(doc.get("default_channel_id"), None);
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let mut doc = ConfigDocument::new();
        doc.set("b", "2");
        doc.set("a", "1");
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"a":"1","b":"2"}"#);
    }
}
