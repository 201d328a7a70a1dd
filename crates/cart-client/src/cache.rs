//! In-memory item cache with optimistic mutations.
//!
//! The cache holds the full collection after one hydration and reflects user
//! intent immediately: mutations are merged locally before the service call
//! resolves. Every mutation keeps a pre-merge snapshot; when the call fails
//! the item reverts to its last-confirmed server state and the failure is
//! recorded against that item as well as in the cache-wide error flag.
//!
//! Bulk operations issue one independent request per item, concurrently,
//! with no transactional grouping: a partial failure leaves the other items
//! mutated.

use std::collections::HashMap;

use chrono::Utc;
use futures::future::join_all;

use cart_domain::{
    add_store, add_tag, clear_from_list, decrement_quantity, derive, increment_quantity,
    sample_items, toggle_purchased, toggle_skipped, Item, ItemFilter, ItemId, ItemPatch,
    ItemStatus, NewItem, SortKey, StatusCounts, View,
};

use crate::api::ItemsApi;
use crate::error::ClientError;

/// The client-side item collection.
///
/// Driven from a single event loop: methods take `&mut self` and there is no
/// internal locking. Concurrency exists only inside the bulk operations,
/// which fan out independent requests over a cloned API handle.
pub struct ItemCache {
    api: ItemsApi,
    items: Vec<Item>,
    item_errors: HashMap<ItemId, String>,
    last_error: Option<String>,
}

impl ItemCache {
    /// Connect to a server and hydrate from `GET /items`.
    pub async fn connect(base_url: &str) -> Result<Self, ClientError> {
        let api = ItemsApi::new(base_url)?;
        let items = api.list().await?;
        Ok(Self {
            api,
            items,
            item_errors: HashMap::new(),
            last_error: None,
        })
    }

    /// Re-fetch the full collection, dropping any unconfirmed local state.
    pub async fn hydrate(&mut self) -> Result<(), ClientError> {
        self.items = self.api.list().await?;
        self.item_errors.clear();
        self.last_error = None;
        Ok(())
    }

    /// The cached collection, newest creation first.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Cache-wide error flag: the most recent failure message.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The most recent failure recorded against a specific item.
    pub fn item_error(&self, id: ItemId) -> Option<&str> {
        self.item_errors.get(&id).map(String::as_str)
    }

    pub fn clear_errors(&mut self) {
        self.item_errors.clear();
        self.last_error = None;
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn record_error(&mut self, id: Option<ItemId>, err: &ClientError) {
        let message = err.to_string();
        tracing::warn!(item = ?id, "{}", message);
        if let Some(id) = id {
            self.item_errors.insert(id, message.clone());
        }
        self.last_error = Some(message);
    }

    /// Create an item. Tags are lowercase-normalized and both value sets are
    /// deduplicated on entry. Nothing is inserted locally unless the service
    /// confirms; the server owns the generated fields.
    pub async fn add(&mut self, new: NewItem) -> Result<ItemId, ClientError> {
        let new = normalize_entry(new);
        match self.api.create(&new).await {
            Ok(item) => {
                let id = item.id;
                self.items.insert(0, item);
                Ok(id)
            }
            Err(err) => {
                self.record_error(None, &err);
                Err(err)
            }
        }
    }

    /// Apply a partial update optimistically, then confirm with the service.
    ///
    /// The patch is merged into the local copy (with a fresh local
    /// `updated_at`) before the request resolves. On success the server's
    /// echoed item replaces the optimistic copy; on failure the item reverts
    /// to its pre-merge state and the error is recorded.
    pub async fn update(&mut self, id: ItemId, patch: ItemPatch) -> Result<(), ClientError> {
        let idx = self.position(id).ok_or(ClientError::UnknownItem(id))?;
        let snapshot = self.items[idx].clone();
        patch.apply(&mut self.items[idx], Utc::now());

        match self.api.update(id, &patch).await {
            Ok(item) => {
                if let Some(idx) = self.position(id) {
                    self.items[idx] = item;
                }
                self.item_errors.remove(&id);
                Ok(())
            }
            Err(err) => {
                if let Some(idx) = self.position(id) {
                    self.items[idx] = snapshot;
                }
                self.record_error(Some(id), &err);
                Err(err)
            }
        }
    }

    /// Delete an item: removed locally up front, restored if the service
    /// refuses.
    pub async fn delete(&mut self, id: ItemId) -> Result<(), ClientError> {
        let idx = self.position(id).ok_or(ClientError::UnknownItem(id))?;
        let snapshot = self.items.remove(idx);

        match self.api.delete(id).await {
            Ok(()) => {
                self.item_errors.remove(&id);
                Ok(())
            }
            Err(err) => {
                let idx = idx.min(self.items.len());
                self.items.insert(idx, snapshot);
                self.record_error(Some(id), &err);
                Err(err)
            }
        }
    }

    // ---- lifecycle conveniences -------------------------------------------

    /// Planning increment: one more needed, status goes pending.
    pub async fn increment(&mut self, id: ItemId) -> Result<(), ClientError> {
        let item = self.get(id).ok_or(ClientError::UnknownItem(id))?;
        let patch = increment_quantity(item);
        self.update(id, patch).await
    }

    /// Planning decrement: at one or below this clears the item off the
    /// active list (quantity 0, no status).
    pub async fn decrement(&mut self, id: ItemId) -> Result<(), ClientError> {
        let item = self.get(id).ok_or(ClientError::UnknownItem(id))?;
        let patch = decrement_quantity(item);
        self.update(id, patch).await
    }

    /// Shopping action button: pending ⇄ purchased. No-op for other states.
    pub async fn toggle_purchased(&mut self, id: ItemId) -> Result<(), ClientError> {
        let item = self.get(id).ok_or(ClientError::UnknownItem(id))?;
        match toggle_purchased(item) {
            Some(patch) => self.update(id, patch).await,
            None => Ok(()),
        }
    }

    /// Skip action: pending/purchased → skipped, skipped → pending.
    pub async fn toggle_skipped(&mut self, id: ItemId) -> Result<(), ClientError> {
        let item = self.get(id).ok_or(ClientError::UnknownItem(id))?;
        match toggle_skipped(item) {
            Some(patch) => self.update(id, patch).await,
            None => Ok(()),
        }
    }

    /// Review-view "complete purchasing": clear every purchased item off the
    /// active list. Returns the number of items confirmed cleared.
    pub async fn complete_purchasing(&mut self) -> usize {
        let targets: Vec<ItemId> = self
            .items
            .iter()
            .filter(|item| item.status == Some(ItemStatus::Purchased))
            .map(|item| item.id)
            .collect();
        self.bulk_update(&targets, clear_from_list()).await
    }

    /// Manual reset: clear status and quantity on every item that is on the
    /// active list. Returns the number of items confirmed cleared.
    pub async fn reset_all(&mut self) -> usize {
        let targets: Vec<ItemId> = self
            .items
            .iter()
            .filter(|item| item.status.is_some() || item.quantity > 0.0)
            .map(|item| item.id)
            .collect();
        self.bulk_update(&targets, clear_from_list()).await
    }

    // ---- bulk operations --------------------------------------------------

    /// Mark the selected items purchased: one independent request per item,
    /// concurrently. Returns the number of items confirmed.
    pub async fn bulk_mark_purchased(&mut self, ids: &[ItemId]) -> usize {
        self.bulk_update(ids, ItemPatch::status(Some(ItemStatus::Purchased)))
            .await
    }

    /// Apply one patch to many items as independent concurrent requests.
    /// Items whose request fails revert individually; the rest stay mutated.
    pub async fn bulk_update(&mut self, ids: &[ItemId], patch: ItemPatch) -> usize {
        let now = Utc::now();
        let mut snapshots = HashMap::new();
        let mut targets = Vec::new();
        for &id in ids {
            if let Some(idx) = self.position(id) {
                snapshots.insert(id, self.items[idx].clone());
                patch.apply(&mut self.items[idx], now);
                targets.push(id);
            }
        }

        let api = self.api.clone();
        let results = join_all(targets.into_iter().map(|id| {
            let api = api.clone();
            let patch = patch.clone();
            async move { (id, api.update(id, &patch).await) }
        }))
        .await;

        let mut confirmed = 0;
        for (id, result) in results {
            match result {
                Ok(item) => {
                    confirmed += 1;
                    if let Some(idx) = self.position(id) {
                        self.items[idx] = item;
                    }
                    self.item_errors.remove(&id);
                }
                Err(err) => {
                    if let (Some(idx), Some(snapshot)) = (self.position(id), snapshots.remove(&id))
                    {
                        self.items[idx] = snapshot;
                    }
                    self.record_error(Some(id), &err);
                }
            }
        }
        confirmed
    }

    /// Delete the selected items: one independent request per item,
    /// concurrently, no atomicity. A failed delete restores only that item.
    /// Returns the number of items confirmed deleted.
    pub async fn bulk_delete(&mut self, ids: &[ItemId]) -> usize {
        let mut snapshots = HashMap::new();
        let mut targets = Vec::new();
        for &id in ids {
            if let Some(idx) = self.position(id) {
                snapshots.insert(id, self.items.remove(idx));
                targets.push(id);
            }
        }

        let api = self.api.clone();
        let results = join_all(targets.into_iter().map(|id| {
            let api = api.clone();
            async move { (id, api.delete(id).await) }
        }))
        .await;

        let mut confirmed = 0;
        for (id, result) in results {
            match result {
                Ok(()) => {
                    confirmed += 1;
                    self.item_errors.remove(&id);
                }
                Err(err) => {
                    if let Some(snapshot) = snapshots.remove(&id) {
                        self.items.push(snapshot);
                    }
                    self.record_error(Some(id), &err);
                }
            }
        }
        confirmed
    }

    /// Load the starter collection. Creates run concurrently; returns the
    /// number of items confirmed created.
    pub async fn seed_sample_data(&mut self) -> usize {
        let api = self.api.clone();
        let results = join_all(
            sample_items()
                .into_iter()
                .map(|new| {
                    let api = api.clone();
                    async move { api.create(&new).await }
                }),
        )
        .await;

        let mut confirmed = 0;
        for result in results {
            match result {
                Ok(item) => {
                    self.items.insert(0, item);
                    confirmed += 1;
                }
                Err(err) => self.record_error(None, &err),
            }
        }
        confirmed
    }

    // ---- view derivation ---------------------------------------------------

    /// The planning view: every item, filtered and sorted.
    pub fn planning_view(&self, filter: &ItemFilter, sort: SortKey) -> Vec<Item> {
        derive(&self.items, View::Planning, filter, sort)
    }

    /// The shopping view: active-trip items, pending first.
    pub fn shopping_view(&self, filter: &ItemFilter, sort: SortKey) -> Vec<Item> {
        derive(&self.items, View::Shopping, filter, sort)
    }

    /// The review tally.
    pub fn review_counts(&self) -> StatusCounts {
        StatusCounts::tally(&self.items)
    }
}

/// Entry-form normalization: lowercase deduplicated tags, trimmed
/// deduplicated stores.
fn normalize_entry(mut new: NewItem) -> NewItem {
    let mut tags = Vec::new();
    for tag in &new.tags {
        add_tag(&mut tags, tag);
    }
    new.tags = tags;

    let mut stores = Vec::new();
    for store in &new.stores {
        add_store(&mut stores, store);
    }
    new.stores = stores;
    new
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_domain::ItemType;

    #[test]
    fn entry_normalization_lowercases_and_dedupes() {
        let new = NewItem {
            name: "Cheese".into(),
            quantity: 1.0,
            unit: "lb".into(),
            status: None,
            item_type: ItemType::Grocery,
            stores: vec![" Costco ".into(), "Costco".into()],
            aisle: None,
            tags: vec!["Dairy".into(), "dairy".into(), "CHEESE".into()],
        };
        let normalized = normalize_entry(new);
        assert_eq!(normalized.tags, vec!["dairy", "cheese"]);
        assert_eq!(normalized.stores, vec!["Costco"]);
    }
}
