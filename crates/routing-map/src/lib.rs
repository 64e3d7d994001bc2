//! Notification routing map builder for the Herald console.
//!
//! A routing map sends notification categories (library ids, or fixed event
//! categories such as `"episodes"` and `"seasons"`) to destination channel
//! ids. The rules:
//!
//! - A category present as a key is enabled; an absent category is disabled.
//! - The empty string as a channel value means "use the default channel".
//! - An empty map at load time bootstraps to "everything enabled with the
//!   default channel" without materializing anything until the operator
//!   makes a change.
//! - The legacy persisted format is a JSON array of enabled categories; it
//!   is migrated at parse time by pointing every listed category at the
//!   current default channel. The array form is never re-emitted.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

/// Category → channel id. The empty string routes to the default channel.
pub type RoutingMap = BTreeMap<String, String>;

/// Channel value meaning "use the default channel".
pub const DEFAULT_CHANNEL: &str = "";

/// Parse a persisted routing field.
///
/// Empty or malformed input yields an empty map. A legacy JSON array is
/// migrated by mapping every listed category to `default_channel` as it is
/// *now*: a one-way upgrade that is never written back by the parser.
pub fn parse(raw: Option<&str>, default_channel: &str) -> RoutingMap {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return RoutingMap::new(),
    };

    if let Ok(map) = serde_json::from_str::<RoutingMap>(raw) {
        return map;
    }

    if let Ok(categories) = serde_json::from_str::<Vec<String>>(raw) {
        debug!(
            count = categories.len(),
            "Migrating legacy routing array to map form"
        );
        return categories
            .into_iter()
            .map(|category| (category, default_channel.to_string()))
            .collect();
    }

    warn!("Malformed routing field, treating as unconfigured");
    RoutingMap::new()
}

/// The set of enabled categories.
///
/// An empty map means "never configured": every known category is treated
/// as enabled without mutating the map.
pub fn enabled_set(map: &RoutingMap, known_categories: &[String]) -> BTreeSet<String> {
    if map.is_empty() {
        return known_categories.iter().cloned().collect();
    }
    map.keys().cloned().collect()
}

/// Whether a category is enabled under the bootstrap rule.
pub fn is_enabled(map: &RoutingMap, category: &str) -> bool {
    map.is_empty() || map.contains_key(category)
}

/// Enable or disable a category.
///
/// Enabling inserts the default-channel value unless an explicit value is
/// already present. Disabling removes the key entirely; disabled categories
/// never appear in the serialized map.
pub fn toggle(map: &mut RoutingMap, category: &str, enabled: bool) {
    if enabled {
        map.entry(category.to_string())
            .or_insert_with(|| DEFAULT_CHANNEL.to_string());
    } else {
        map.remove(category);
    }
}

/// Point an enabled category at a channel.
///
/// Returns `false` without touching the map when the category is disabled;
/// the UI greys the selector out, and the data layer holds the same line.
pub fn set_channel(map: &mut RoutingMap, category: &str, channel_id: &str) -> bool {
    match map.get_mut(category) {
        Some(value) => {
            *value = channel_id.to_string();
            true
        }
        None => false,
    }
}

/// Canonical JSON of the object form.
pub fn serialize(map: &RoutingMap) -> String {
    // BTreeMap ordering keys makes the output canonical; a map of strings
    // cannot fail to serialize.
    serde_json::to_string(map).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_parse_none_and_empty() {
        assert!(parse(None, "C1").is_empty());
        assert!(parse(Some(""), "C1").is_empty());
        assert!(parse(Some("   "), "C1").is_empty());
    }

    #[test]
    fn test_parse_malformed_is_empty() {
        assert!(parse(Some("{broken"), "C1").is_empty());
        assert!(parse(Some("42"), "C1").is_empty());
        assert!(parse(Some(r#"{"libA": 3}"#), "C1").is_empty());
    }

    #[test]
    fn test_parse_object_used_as_is() {
        let map = parse(Some(r#"{"libA":"C7","libB":""}"#), "C1");
        assert_eq!(map.get("libA").map(String::as_str), Some("C7"));
        assert_eq!(map.get("libB").map(String::as_str), Some(""));
    }

    #[test]
    fn test_parse_legacy_array_migrates_to_current_default() {
        let map = parse(Some(r#"["libA","libB"]"#), "C1");
        assert_eq!(map.get("libA").map(String::as_str), Some("C1"));
        assert_eq!(map.get("libB").map(String::as_str), Some("C1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_round_trip_law() {
        let mut map = RoutingMap::new();
        map.insert("episodes".to_string(), "C9".to_string());
        map.insert("libA".to_string(), String::new());

        let reparsed = parse(Some(&serialize(&map)), "C1");
        assert_eq!(reparsed, map);
    }

    #[test]
    fn test_serialize_never_emits_array_form() {
        let map = parse(Some(r#"["libA"]"#), "C1");
        let raw = serialize(&map);
        assert!(raw.starts_with('{'));
        assert_eq!(raw, r#"{"libA":"C1"}"#);
    }

    #[test]
    fn test_bootstrap_enabled_set_without_mutation() {
        let map = RoutingMap::new();
        let enabled = enabled_set(&map, &known(&["libA", "libB"]));
        assert!(enabled.contains("libA"));
        assert!(enabled.contains("libB"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_enabled_set_from_keys_when_configured() {
        let mut map = RoutingMap::new();
        toggle(&mut map, "libA", true);
        let enabled = enabled_set(&map, &known(&["libA", "libB"]));
        assert!(enabled.contains("libA"));
        assert!(!enabled.contains("libB"));
    }

    #[test]
    fn test_toggle_off_then_on_resets_to_default() {
        let mut map = RoutingMap::new();
        map.insert("libA".to_string(), "C7".to_string());

        toggle(&mut map, "libA", false);
        assert!(!map.contains_key("libA"));

        toggle(&mut map, "libA", true);
        assert_eq!(map.get("libA").map(String::as_str), Some(DEFAULT_CHANNEL));
    }

    #[test]
    fn test_toggle_on_preserves_existing_explicit_value() {
        let mut map = RoutingMap::new();
        map.insert("libA".to_string(), "C7".to_string());

        toggle(&mut map, "libA", true);
        assert_eq!(map.get("libA").map(String::as_str), Some("C7"));
    }

    #[test]
    fn test_disable_on_bootstrapped_then_materialized_map() {
        // Bootstrapped state materialized by the operator: both enabled.
        let mut map = RoutingMap::new();
        toggle(&mut map, "libA", true);
        toggle(&mut map, "libB", true);

        toggle(&mut map, "libA", false);
        assert_eq!(serialize(&map), r#"{"libB":""}"#);
    }

    #[test]
    fn test_set_channel_requires_enabled_category() {
        let mut map = RoutingMap::new();
        assert!(!set_channel(&mut map, "libA", "C5"));
        assert!(map.is_empty());

        toggle(&mut map, "libA", true);
        assert!(set_channel(&mut map, "libA", "C5"));
        assert_eq!(map.get("libA").map(String::as_str), Some("C5"));
    }

    #[test]
    fn test_is_enabled_bootstrap_and_configured() {
        let mut map = RoutingMap::new();
        assert!(is_enabled(&map, "anything"));

        toggle(&mut map, "libA", true);
        assert!(is_enabled(&map, "libA"));
        assert!(!is_enabled(&map, "libB"));
    }
}
