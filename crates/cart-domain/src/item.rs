use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Globally unique item identifier (UUID v4).
pub type ItemId = Uuid;

/// Lifecycle stage of an item relative to the active shopping trip.
///
/// An item with no status (`Option::None` on [`Item::status`]) is on the
/// master list only: known, but not currently being shopped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Purchased,
    Skipped,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemStatus::Pending => write!(f, "pending"),
            ItemStatus::Purchased => write!(f, "purchased"),
            ItemStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Broad category of an item. Used for filtering only; carries no
/// behavioral effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    #[default]
    Grocery,
    Supply,
    Clothing,
    Other,
}

impl ItemType {
    /// Label used for display and sorting.
    pub fn label(&self) -> &'static str {
        match self {
            ItemType::Grocery => "grocery",
            ItemType::Supply => "supply",
            ItemType::Clothing => "clothing",
            ItemType::Other => "other",
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The sole entity of the cart apps.
///
/// `id` and both timestamps are server-assigned; everything else is caller
/// data. `stores` and `tags` have set semantics (no duplicates, order
/// irrelevant), enforced at the point of entry, not at the data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub status: Option<ItemStatus>,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub stores: Vec<String>,
    pub aisle: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload: everything the server does not assign itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub status: Option<ItemStatus>,
    #[serde(rename = "type", default)]
    pub item_type: ItemType,
    #[serde(default)]
    pub stores: Vec<String>,
    #[serde(default)]
    pub aisle: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_quantity() -> f64 {
    1.0
}

impl NewItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: 1.0,
            unit: "count".to_string(),
            status: None,
            item_type: ItemType::Grocery,
            stores: Vec::new(),
            aisle: None,
            tags: Vec::new(),
        }
    }

    /// Materialize into an [`Item`] with server-assigned id and timestamps.
    pub fn into_item(self, now: DateTime<Utc>) -> Item {
        Item {
            id: Uuid::new_v4(),
            name: self.name,
            quantity: self.quantity.max(0.0),
            unit: self.unit,
            status: self.status,
            item_type: self.item_type,
            stores: self.stores,
            aisle: self.aisle.filter(|a| !a.trim().is_empty()),
            tags: self.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update payload.
///
/// Keys absent from the wire payload leave the field untouched. For `status`
/// and `aisle` a key that is present with a `null` value is an explicit
/// clear, so those fields are double-wrapped: the outer `Option` is presence,
/// the inner is the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub status: Option<Option<ItemStatus>>,
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub item_type: Option<ItemType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stores: Option<Vec<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub aisle: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Wrap a value (even an explicit `null`) in `Some`, so an absent key and a
/// null key deserialize differently under `#[serde(default)]`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ItemPatch {
    /// True when no key is present.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Convenience for the single most common patch.
    pub fn status(status: Option<ItemStatus>) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Merge the present keys into `item` and refresh its `updated_at`.
    ///
    /// An aisle set to an empty or whitespace string clears it, matching the
    /// clear-on-empty contract of the update API.
    pub fn apply(&self, item: &mut Item, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity.max(0.0);
        }
        if let Some(unit) = &self.unit {
            item.unit = unit.clone();
        }
        if let Some(status) = self.status {
            item.status = status;
        }
        if let Some(item_type) = self.item_type {
            item.item_type = item_type;
        }
        if let Some(stores) = &self.stores {
            item.stores = stores.clone();
        }
        if let Some(aisle) = &self.aisle {
            item.aisle = aisle.clone().filter(|a| !a.trim().is_empty());
        }
        if let Some(tags) = &self.tags {
            item.tags = tags.clone();
        }
        item.updated_at = now;
    }
}

/// Normalize a tag the way the entry form does: trim and lowercase.
pub fn normalize_tag(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Add a tag to a set, normalizing and refusing duplicates.
/// Returns true if the tag was added.
pub fn add_tag(tags: &mut Vec<String>, raw: &str) -> bool {
    let tag = normalize_tag(raw);
    if tag.is_empty() || tags.iter().any(|t| *t == tag) {
        return false;
    }
    tags.push(tag);
    true
}

/// Add a store to a set, trimming and refusing duplicates.
/// Returns true if the store was added.
pub fn add_store(stores: &mut Vec<String>, raw: &str) -> bool {
    let store = raw.trim();
    if store.is_empty() || stores.iter().any(|s| s == store) {
        return false;
    }
    stores.push(store.to_string());
    true
}
