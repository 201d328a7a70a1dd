use cart_domain::{Item, ItemId, ItemPatch, NewItem};

/// The trait storage backends implement.
pub trait GroceryStore: Send + Sync {
    /// All items, newest creation first.
    fn list(&self) -> Result<Vec<Item>, StoreError>;

    /// Get an item by id.
    fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError>;

    /// Insert a new item. The store assigns id and both timestamps and
    /// returns the stored row.
    fn insert(&self, new: NewItem) -> Result<Item, StoreError>;

    /// Apply the present keys of a partial update and refresh `updated_at`.
    /// Returns the stored row after the update.
    fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, StoreError>;

    /// Delete an item by id.
    fn delete(&self, id: ItemId) -> Result<(), StoreError>;

    /// Number of stored items.
    fn count(&self) -> Result<usize, StoreError>;
}

/// Errors from the item store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    #[error("Storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn store_error_display() {
        let err = StoreError::NotFound(Uuid::nil());
        assert!(err.to_string().contains("not found"));

        let err = StoreError::Storage("disk on fire".into());
        assert!(err.to_string().contains("disk on fire"));
    }
}
