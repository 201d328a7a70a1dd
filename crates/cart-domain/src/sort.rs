//! Sort keys and comparators for item lists.
//!
//! Aisle values are heterogeneous free text (numbers, names, emoji-prefixed
//! labels), so the aisle order is defined through [`AisleKey`], a sortable
//! key extracted once per item rather than re-derived per comparison.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::item::{Item, ItemStatus};

/// Selectable sort key. Sorting is stable: items that compare equal keep
/// their relative order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Name,
    Type,
    Store,
    Aisle,
    /// Newest first. The default.
    #[default]
    DateAdded,
}

/// Category rank for an aisle label. Lower ranks sort first.
const RANK_EMOJI: u8 = 0;
const RANK_NUMERIC: u8 = 1;
const RANK_TEXT: u8 = 2;
const RANK_MISSING: u8 = 3;

/// Total-order key for an aisle value: `(category rank, numeric or lexical
/// key)`. Emoji-prefixed labels sort first (alphabetically among
/// themselves), then purely numeric labels (numerically), then textual
/// labels (case-insensitively); a missing or empty aisle sorts last.
#[derive(Debug, Clone, PartialEq)]
pub struct AisleKey {
    rank: u8,
    numeric: f64,
    text: String,
}

impl AisleKey {
    pub fn from_aisle(aisle: Option<&str>) -> Self {
        let label = aisle.map(str::trim).unwrap_or("");
        if label.is_empty() {
            return Self {
                rank: RANK_MISSING,
                numeric: 0.0,
                text: String::new(),
            };
        }
        if label.chars().next().is_some_and(is_emoji) {
            return Self {
                rank: RANK_EMOJI,
                numeric: 0.0,
                text: label.to_lowercase(),
            };
        }
        if let Ok(n) = label.parse::<f64>() {
            return Self {
                rank: RANK_NUMERIC,
                numeric: n,
                text: String::new(),
            };
        }
        Self {
            rank: RANK_TEXT,
            numeric: 0.0,
            text: label.to_lowercase(),
        }
    }
}

impl Eq for AisleKey {}

impl Ord for AisleKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| self.numeric.total_cmp(&other.numeric))
            .then_with(|| self.text.cmp(&other.text))
    }
}

impl PartialOrd for AisleKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Emoji detection for aisle labels: the pictographic and symbol blocks the
/// entry form actually produces (🥦, 🧀, ❄, …).
fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF | 0x2600..=0x27BF | 0x2B00..=0x2BFF
    )
}

/// Rank used as the shopping view's primary key: pending items come first,
/// then purchased, then skipped.
pub fn status_rank(status: Option<ItemStatus>) -> u8 {
    match status {
        Some(ItemStatus::Pending) => 0,
        Some(ItemStatus::Purchased) => 1,
        Some(ItemStatus::Skipped) => 2,
        None => 3,
    }
}

/// Compare two items under a sort key.
pub fn compare(a: &Item, b: &Item, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => fold_case_cmp(&a.name, &b.name),
        SortKey::Type => fold_case_cmp(a.item_type.label(), b.item_type.label()),
        SortKey::Store => fold_case_cmp(first_store(a), first_store(b)),
        SortKey::Aisle => AisleKey::from_aisle(a.aisle.as_deref())
            .cmp(&AisleKey::from_aisle(b.aisle.as_deref()))
            .then_with(|| fold_case_cmp(&a.name, &b.name)),
        SortKey::DateAdded => b.created_at.cmp(&a.created_at),
    }
}

/// Stable in-place sort under a sort key.
pub fn sort_items(items: &mut [Item], key: SortKey) {
    match key {
        // Key extraction once per item; ties break on case-insensitive name.
        SortKey::Aisle => items.sort_by_cached_key(|item| {
            (
                AisleKey::from_aisle(item.aisle.as_deref()),
                item.name.to_lowercase(),
            )
        }),
        _ => items.sort_by(|a, b| compare(a, b, key)),
    }
}

/// Stable sort for the shopping view: status rank first, then the active
/// sort key.
pub fn sort_for_shopping(items: &mut [Item], key: SortKey) {
    items.sort_by(|a, b| {
        status_rank(a.status)
            .cmp(&status_rank(b.status))
            .then_with(|| compare(a, b, key))
    });
}

fn fold_case_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Empty string when the item has no store; multi-store items sort on their
/// first store.
fn first_store(item: &Item) -> &str {
    item.stores.first().map(String::as_str).unwrap_or("")
}
