//! The identity selector state machine.
//!
//! A selector is the searchable single-selection control bound to one
//! directory. It is modeled as a plain state machine so the linking flow is
//! unit-testable without any UI wiring: the UI dispatches events
//! ([`IdentitySelector::activate`], [`IdentitySelector::input`],
//! [`IdentitySelector::choose`], [`IdentitySelector::dismiss`]) and renders
//! from [`IdentitySelector::status`] and [`IdentitySelector::filter`].

use console_core::IdentityRecord;
use mapping_store::MappingStore;

/// Observable state of a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorStatus {
    /// Not open, nothing selected.
    Closed,
    /// Open with a live search query.
    Searching,
    /// Closed with a retained selection.
    Selected,
}

/// A searchable, single-selection control over one directory.
#[derive(Debug, Clone, Default)]
pub struct IdentitySelector {
    open: bool,
    query: String,
    selection: Option<IdentityRecord>,
}

impl IdentitySelector {
    /// Create a closed selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status.
    pub fn status(&self) -> SelectorStatus {
        if self.open {
            SelectorStatus::Searching
        } else if self.selection.is_some() {
            SelectorStatus::Selected
        } else {
            SelectorStatus::Closed
        }
    }

    /// Open the selector for a new search. A previous selection is retained
    /// until overwritten. Returns `true` when this newly opened the control
    /// (the caller uses that to trigger a directory load).
    pub fn activate(&mut self) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        self.query.clear();
        true
    }

    /// Update the search query. Ignored while closed.
    pub fn input(&mut self, query: impl Into<String>) {
        if self.open {
            self.query = query.into();
        }
    }

    /// The live query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The records matching the live query, by case-insensitive substring
    /// against display name and secondary label.
    pub fn filter<'a>(&self, records: &'a [IdentityRecord]) -> Vec<&'a IdentityRecord> {
        records
            .iter()
            .filter(|record| record.matches(&self.query))
            .collect()
    }

    /// Select a record, closing the search.
    pub fn choose(&mut self, record: IdentityRecord) {
        self.selection = Some(record);
        self.open = false;
    }

    /// Close without selecting (clicking outside the control). A retained
    /// selection stays.
    pub fn dismiss(&mut self) {
        self.open = false;
    }

    /// The retained selection.
    pub fn selection(&self) -> Option<&IdentityRecord> {
        self.selection.as_ref()
    }

    /// Consume the selection for an external action (e.g., submitting a
    /// link), returning the control to closed.
    pub fn take_selection(&mut self) -> Option<IdentityRecord> {
        self.open = false;
        self.selection.take()
    }
}

/// One row of a rendered selector list: the record plus the
/// already-linked hint. The hint is non-authoritative; the server enforces
/// uniqueness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorEntry<'a> {
    pub record: &'a IdentityRecord,
    pub linked: bool,
}

/// Annotate filtered records with the linked hint for one side.
pub fn annotate_primary<'a>(
    records: Vec<&'a IdentityRecord>,
    store: &MappingStore,
) -> Vec<SelectorEntry<'a>> {
    records
        .into_iter()
        .map(|record| SelectorEntry {
            linked: store.is_primary_linked(&record.id),
            record,
        })
        .collect()
}

/// Annotate filtered records with the linked hint for the service side.
pub fn annotate_secondary<'a>(
    records: Vec<&'a IdentityRecord>,
    store: &MappingStore,
) -> Vec<SelectorEntry<'a>> {
    records
        .into_iter()
        .map(|record| SelectorEntry {
            linked: store.is_secondary_linked(&record.id),
            record,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<IdentityRecord> {
        vec![
            IdentityRecord {
                secondary_label: Some("alice#1234".to_string()),
                ..IdentityRecord::new("100", "Alice")
            },
            IdentityRecord::new("200", "Bob"),
        ]
    }

    #[test]
    fn test_closed_to_searching_on_activate() {
        let mut selector = IdentitySelector::new();
        assert_eq!(selector.status(), SelectorStatus::Closed);

        assert!(selector.activate());
        assert_eq!(selector.status(), SelectorStatus::Searching);

        // Re-activating an open selector is not a new opening.
        assert!(!selector.activate());
    }

    #[test]
    fn test_choose_transitions_to_selected() {
        let mut selector = IdentitySelector::new();
        selector.activate();
        selector.choose(records()[0].clone());

        assert_eq!(selector.status(), SelectorStatus::Selected);
        assert_eq!(selector.selection().map(|r| r.id.as_str()), Some("100"));
    }

    #[test]
    fn test_reactivate_retains_selection_until_overwritten() {
        let mut selector = IdentitySelector::new();
        selector.activate();
        selector.choose(records()[0].clone());

        assert!(selector.activate());
        assert_eq!(selector.status(), SelectorStatus::Searching);
        assert_eq!(selector.selection().map(|r| r.id.as_str()), Some("100"));

        selector.choose(records()[1].clone());
        assert_eq!(selector.selection().map(|r| r.id.as_str()), Some("200"));
    }

    #[test]
    fn test_dismiss_closes_only_without_selection() {
        let mut selector = IdentitySelector::new();
        selector.activate();
        selector.dismiss();
        assert_eq!(selector.status(), SelectorStatus::Closed);

        selector.activate();
        selector.choose(records()[0].clone());
        selector.activate();
        selector.dismiss();
        assert_eq!(selector.status(), SelectorStatus::Selected);
    }

    #[test]
    fn test_take_selection_consumes_and_closes() {
        let mut selector = IdentitySelector::new();
        selector.activate();
        selector.choose(records()[0].clone());

        let taken = selector.take_selection();
        assert_eq!(taken.map(|r| r.id), Some("100".to_string()));
        assert_eq!(selector.status(), SelectorStatus::Closed);
        assert!(selector.take_selection().is_none());
    }

    #[test]
    fn test_filter_matches_name_and_label() {
        let mut selector = IdentitySelector::new();
        let records = records();
        selector.activate();

        selector.input("ali");
        assert_eq!(selector.filter(&records).len(), 1);

        selector.input("1234");
        assert_eq!(selector.filter(&records).len(), 1);

        selector.input("");
        assert_eq!(selector.filter(&records).len(), 2);

        selector.input("nobody");
        assert!(selector.filter(&records).is_empty());
    }

    #[test]
    fn test_activate_resets_query() {
        let mut selector = IdentitySelector::new();
        selector.activate();
        selector.input("ali");
        selector.dismiss();

        selector.activate();
        assert_eq!(selector.query(), "");
    }
}
