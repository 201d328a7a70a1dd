//! Sample data for seeding a fresh list and for tests.

use crate::item::{ItemStatus, ItemType, NewItem};

fn entry(
    name: &str,
    quantity: f64,
    unit: &str,
    status: Option<ItemStatus>,
    item_type: ItemType,
    stores: &[&str],
    aisle: Option<&str>,
    tags: &[&str],
) -> NewItem {
    NewItem {
        name: name.to_string(),
        quantity,
        unit: unit.to_string(),
        status,
        item_type,
        stores: stores.iter().map(|s| s.to_string()).collect(),
        aisle: aisle.map(str::to_string),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// The starter collection offered when the list is empty.
pub fn sample_items() -> Vec<NewItem> {
    use ItemStatus::*;
    use ItemType::*;
    vec![
        entry("Bananas", 3.0, "bunch", None, Grocery, &["Costco", "BJ's"], Some("Produce"), &["fruit", "produce"]),
        entry("Milk", 1.0, "gallon", None, Grocery, &["Trader Joe's"], Some("Dairy"), &["dairy", "beverages"]),
        entry("Bread", 2.0, "loaf", Some(Purchased), Grocery, &["Trader Joe's", "Costco"], Some("Bakery"), &["bakery", "grains"]),
        entry("Chicken Breast", 2.0, "lb", Some(Pending), Grocery, &["Costco"], Some("Meat"), &["protein", "meat"]),
        entry("Apples", 5.0, "count", None, Grocery, &["Costco", "BJ's"], Some("Produce"), &["fruit", "produce"]),
        entry("Eggs", 2.0, "dozen", Some(Skipped), Grocery, &["Trader Joe's"], Some("Dairy"), &["dairy", "protein"]),
        entry("Greek Yogurt", 6.0, "count", Some(Pending), Grocery, &["Trader Joe's"], Some("Dairy"), &["dairy", "breakfast"]),
        entry("Baby Spinach", 1.0, "bag", None, Grocery, &["Costco", "Trader Joe's"], Some("Produce"), &["vegetables", "produce"]),
        entry("Olive Oil", 1.0, "bottle", Some(Purchased), Grocery, &["Costco"], Some("Aisle 12"), &["pantry", "cooking"]),
        entry("Pasta", 3.0, "box", None, Grocery, &["Trader Joe's"], Some("Aisle 5"), &["pantry", "grains"]),
        entry("Tomatoes", 6.0, "count", None, Grocery, &["Costco", "BJ's"], Some("Produce"), &["vegetables", "produce"]),
        entry("Cheese", 1.0, "lb", None, Grocery, &["Trader Joe's", "Costco"], Some("Dairy"), &["dairy", "cheese"]),
        entry("Rotisserie Chicken", 1.0, "count", None, Grocery, &["Costco"], Some("Deli"), &["protein", "prepared"]),
        entry("Paper Towels", 2.0, "pack", None, Supply, &["Costco", "Target"], Some("Paper Goods"), &["household"]),
        entry("Kids T-Shirts", 3.0, "count", None, Clothing, &["Target", "Old Navy"], Some("Kids"), &["clothing"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_has_all_types_and_statuses() {
        let items = sample_items();
        assert_eq!(items.len(), 15);
        assert!(items.iter().any(|i| i.item_type == ItemType::Supply));
        assert!(items.iter().any(|i| i.item_type == ItemType::Clothing));
        assert!(items.iter().any(|i| i.status == Some(ItemStatus::Pending)));
        assert!(items.iter().any(|i| i.status == Some(ItemStatus::Skipped)));
        assert!(items.iter().any(|i| i.status.is_none()));
    }

    #[test]
    fn sample_tags_are_already_normalized() {
        for item in sample_items() {
            for tag in &item.tags {
                assert_eq!(*tag, crate::item::normalize_tag(tag));
            }
        }
    }
}
