//! Stateful routing tables bound to config fields.
//!
//! [`RouteTable`] wraps one routing map (`routing-map` crate) together with
//! the config field it lives in and the categories currently known for it.
//! It adds the materialization step the checkbox UI implies: an empty map
//! bootstraps to "everything enabled with the default channel", and the
//! first operator change writes that implied state out before applying the
//! change.

use std::collections::BTreeSet;

use console_core::ConfigDocument;
use routing_map::RoutingMap;

/// One routing map bound to its config field.
#[derive(Debug, Clone)]
pub struct RouteTable {
    field: String,
    map: RoutingMap,
    known: Vec<String>,
}

impl RouteTable {
    /// Parse the table out of a config document field.
    pub fn load(
        field: impl Into<String>,
        doc: &ConfigDocument,
        default_channel: &str,
        known: Vec<String>,
    ) -> Self {
        let field = field.into();
        let map = routing_map::parse(doc.get(&field), default_channel);
        Self { field, map, known }
    }

    /// The config field this table serializes into.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The current map.
    pub fn map(&self) -> &RoutingMap {
        &self.map
    }

    /// Replace the known category list (e.g., after a library refresh).
    pub fn set_known(&mut self, known: Vec<String>) {
        self.known = known;
    }

    /// Enabled categories under the bootstrap rule.
    pub fn enabled(&self) -> BTreeSet<String> {
        routing_map::enabled_set(&self.map, &self.known)
    }

    /// Whether one category is enabled.
    pub fn is_enabled(&self, category: &str) -> bool {
        routing_map::is_enabled(&self.map, category)
    }

    /// Enable or disable a category. The first change to a bootstrapped
    /// table materializes the implied all-enabled state.
    pub fn toggle(&mut self, category: &str, enabled: bool) {
        self.materialize_if_bootstrapped();
        routing_map::toggle(&mut self.map, category, enabled);
    }

    /// Point an enabled category at a channel. Returns `false` for
    /// disabled categories.
    pub fn set_channel(&mut self, category: &str, channel_id: &str) -> bool {
        self.materialize_if_bootstrapped();
        routing_map::set_channel(&mut self.map, category, channel_id)
    }

    /// Serialize the table into its config field.
    pub fn write_to(&self, doc: &mut ConfigDocument) {
        doc.set(self.field.clone(), routing_map::serialize(&self.map));
    }

    fn materialize_if_bootstrapped(&mut self) {
        if !self.map.is_empty() {
            return;
        }
        for category in &self.known {
            self.map
                .insert(category.clone(), routing_map::DEFAULT_CHANNEL.to_string());
        }
    }
}
