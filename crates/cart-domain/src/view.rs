//! View-specific derivation: admission predicates per view, the review
//! tally, and the full filter → view → sort pipeline.

use serde::{Deserialize, Serialize};

use crate::filter::ItemFilter;
use crate::item::{Item, ItemStatus};
use crate::sort::{sort_for_shopping, sort_items, SortKey};

/// The three views over the item collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// The master list. Every item is admitted.
    Planning,
    /// The active trip: pending, purchased, and skipped items.
    Shopping,
    /// Counts only; admits everything and filters nothing.
    Review,
}

impl View {
    /// Whether an item belongs in this view at all, before user filters.
    pub fn admits(&self, item: &Item) -> bool {
        match self {
            View::Planning | View::Review => true,
            View::Shopping => matches!(
                item.status,
                Some(ItemStatus::Pending) | Some(ItemStatus::Purchased) | Some(ItemStatus::Skipped)
            ),
        }
    }
}

/// Status tally for the review view and the planning header cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub unset: usize,
    pub pending: usize,
    pub purchased: usize,
    pub skipped: usize,
    pub total: usize,
}

impl StatusCounts {
    pub fn tally(items: &[Item]) -> Self {
        let mut counts = Self::default();
        for item in items {
            match item.status {
                None => counts.unset += 1,
                Some(ItemStatus::Pending) => counts.pending += 1,
                Some(ItemStatus::Purchased) => counts.purchased += 1,
                Some(ItemStatus::Skipped) => counts.skipped += 1,
            }
            counts.total += 1;
        }
        counts
    }
}

/// Derive the displayed item sequence for a view: admission predicate, then
/// the user's filter, then the sort. Pure; the input collection is untouched.
pub fn derive(items: &[Item], view: View, filter: &ItemFilter, sort: SortKey) -> Vec<Item> {
    let mut out: Vec<Item> = items
        .iter()
        .filter(|item| view.admits(item) && filter.matches(item))
        .cloned()
        .collect();
    match view {
        View::Shopping => sort_for_shopping(&mut out, sort),
        _ => sort_items(&mut out, sort),
    }
    out
}
