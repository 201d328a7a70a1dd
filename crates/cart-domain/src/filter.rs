//! Item filtering.
//!
//! Each dimension of [`ItemFilter`] is AND-combined with the others when
//! present; within the tag set the match is OR (an item qualifies if it
//! carries any selected tag).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::item::{Item, ItemStatus, ItemType};

/// Status filter dimension. Matching "no status" is an explicit choice, not
/// the absence of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFilter {
    /// Items with no status (master-list only).
    Unset,
    /// Items with exactly this status.
    Is(ItemStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: Option<ItemStatus>) -> bool {
        match self {
            StatusFilter::Unset => status.is_none(),
            StatusFilter::Is(s) => status == Some(*s),
        }
    }
}

/// A combined filter over the item collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemFilter {
    /// Free-text search over name, stores, aisle, and tags.
    pub search: Option<String>,
    /// Selected tags (OR within the set).
    pub tags: Vec<String>,
    /// Exact membership in the item's store set.
    pub store: Option<String>,
    /// Exact type equality.
    pub item_type: Option<ItemType>,
    /// Exact status equality, including the explicit no-status state.
    pub status: Option<StatusFilter>,
}

impl ItemFilter {
    /// True when no dimension is active.
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.tags.is_empty()
            && self.store.is_none()
            && self.item_type.is_none()
            && self.status.is_none()
    }

    /// Test an item against every active dimension.
    pub fn matches(&self, item: &Item) -> bool {
        if let Some(query) = self.search.as_deref() {
            let query = query.trim().to_lowercase();
            if !query.is_empty() && !search_matches(item, &query) {
                return false;
            }
        }
        if !self.tags.is_empty()
            && !self.tags.iter().any(|tag| item.tags.iter().any(|t| t == tag))
        {
            return false;
        }
        if let Some(store) = &self.store {
            if !item.stores.iter().any(|s| s == store) {
                return false;
            }
        }
        if let Some(item_type) = self.item_type {
            if item.item_type != item_type {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if !status.matches(item.status) {
                return false;
            }
        }
        true
    }
}

/// Case-insensitive substring match against name, any store, aisle, or any
/// tag. The query is already lowercased.
fn search_matches(item: &Item, query: &str) -> bool {
    item.name.to_lowercase().contains(query)
        || item.stores.iter().any(|s| s.to_lowercase().contains(query))
        || item
            .aisle
            .as_deref()
            .is_some_and(|a| a.to_lowercase().contains(query))
        || item.tags.iter().any(|t| t.to_lowercase().contains(query))
}

/// Sorted distinct tags across a collection.
pub fn all_tags(items: &[Item]) -> Vec<String> {
    let mut tags: Vec<String> = items
        .iter()
        .flat_map(|item| item.tags.iter().cloned())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

/// Sorted distinct stores across a collection.
pub fn all_stores(items: &[Item]) -> Vec<String> {
    let mut stores: Vec<String> = items
        .iter()
        .flat_map(|item| item.stores.iter().cloned())
        .collect();
    stores.sort();
    stores.dedup();
    stores
}

/// Per-store item counts, e.g. for the shopping view's store dropdown.
pub fn store_counts(items: &[Item]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for item in items {
        for store in &item.stores {
            *counts.entry(store.clone()).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::NewItem;
    use chrono::Utc;

    fn make_item(name: &str) -> Item {
        NewItem::named(name).into_item(Utc::now())
    }

    fn tagged(name: &str, tags: &[&str]) -> Item {
        let mut item = make_item(name);
        item.tags = tags.iter().map(|t| t.to_string()).collect();
        item
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = ItemFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&make_item("Anything")));
    }

    #[test]
    fn search_spans_name_store_aisle_and_tags() {
        let mut item = make_item("Chicken Breast");
        item.stores = vec!["Costco".into()];
        item.aisle = Some("Meat".into());
        item.tags = vec!["protein".into()];

        for query in ["chicken", "COSTCO", "meat", "protein"] {
            let filter = ItemFilter {
                search: Some(query.into()),
                ..Default::default()
            };
            assert!(filter.matches(&item), "query {query:?} should match");
        }

        let filter = ItemFilter {
            search: Some("bakery".into()),
            ..Default::default()
        };
        assert!(!filter.matches(&item));
    }

    #[test]
    fn tag_filter_is_or_within_set() {
        let items = [
            tagged("Milk", &["dairy"]),
            tagged("Spinach", &["produce"]),
            tagged("Eggs", &["dairy", "protein"]),
        ];

        let filter = ItemFilter {
            tags: vec!["dairy".into()],
            ..Default::default()
        };
        let matched: Vec<&str> = items
            .iter()
            .filter(|i| filter.matches(i))
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(matched, vec!["Milk", "Eggs"]);

        let either = ItemFilter {
            tags: vec!["produce".into(), "protein".into()],
            ..Default::default()
        };
        assert_eq!(items.iter().filter(|i| either.matches(i)).count(), 2);
    }

    #[test]
    fn store_filter_is_exact_membership() {
        let mut item = make_item("Bread");
        item.stores = vec!["Trader Joe's".into(), "Costco".into()];

        let filter = ItemFilter {
            store: Some("Costco".into()),
            ..Default::default()
        };
        assert!(filter.matches(&item));

        let other = ItemFilter {
            store: Some("Target".into()),
            ..Default::default()
        };
        assert!(!other.matches(&item));
    }

    #[test]
    fn status_filter_distinguishes_unset_from_any() {
        let unset = make_item("Master-list only");
        let mut pending = make_item("Pending");
        pending.status = Some(ItemStatus::Pending);

        let filter = ItemFilter {
            status: Some(StatusFilter::Unset),
            ..Default::default()
        };
        assert!(filter.matches(&unset));
        assert!(!filter.matches(&pending));

        let filter = ItemFilter {
            status: Some(StatusFilter::Is(ItemStatus::Pending)),
            ..Default::default()
        };
        assert!(!filter.matches(&unset));
        assert!(filter.matches(&pending));
    }

    #[test]
    fn dimensions_are_and_combined() {
        let mut item = tagged("Cheese", &["dairy"]);
        item.stores = vec!["Costco".into()];
        item.status = Some(ItemStatus::Pending);

        let filter = ItemFilter {
            tags: vec!["dairy".into()],
            store: Some("Costco".into()),
            status: Some(StatusFilter::Is(ItemStatus::Pending)),
            ..Default::default()
        };
        assert!(filter.matches(&item));

        let mismatched_store = ItemFilter {
            store: Some("Target".into()),
            ..filter
        };
        assert!(!mismatched_store.matches(&item));
    }

    #[test]
    fn distinct_tag_and_store_enumeration() {
        let mut a = tagged("A", &["fruit", "produce"]);
        a.stores = vec!["Costco".into()];
        let mut b = tagged("B", &["produce"]);
        b.stores = vec!["Costco".into(), "BJ's".into()];

        let items = [a, b];
        assert_eq!(all_tags(&items), vec!["fruit", "produce"]);
        assert_eq!(all_stores(&items), vec!["BJ's", "Costco"]);

        let counts = store_counts(&items);
        assert_eq!(counts["Costco"], 2);
        assert_eq!(counts["BJ's"], 1);
    }
}
