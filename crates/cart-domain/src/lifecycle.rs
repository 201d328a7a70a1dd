//! Status lifecycle: the state machine the planning, shopping, and review
//! views drive.
//!
//! Transitions:
//! - none → pending (planning increment from zero)
//! - pending ⇄ purchased (shopping toggle)
//! - pending/purchased → skipped, skipped → pending (skip toggle)
//! - any → none with quantity forced to 0 (planning decrement to zero,
//!   complete-purchasing, manual reset)
//!
//! Clearing to none and re-setting the current status are always legal;
//! everything else outside the edges above is rejected with a typed error.

use thiserror::Error;

use crate::item::{Item, ItemPatch, ItemStatus};

/// A status change outside the documented lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status transition from {} to {}", display(.from), display(.to))]
pub struct InvalidTransition {
    pub from: Option<ItemStatus>,
    pub to: Option<ItemStatus>,
}

fn display(status: &Option<ItemStatus>) -> String {
    match status {
        Some(s) => s.to_string(),
        None => "none".to_string(),
    }
}

/// Validate a status transition against the lifecycle.
pub fn validate_transition(
    from: Option<ItemStatus>,
    to: Option<ItemStatus>,
) -> Result<(), InvalidTransition> {
    use ItemStatus::*;
    let legal = match (from, to) {
        // Clears and self-transitions are always legal.
        (_, None) => true,
        (a, b) if a == b => true,
        (None, Some(Pending)) => true,
        (Some(Pending), Some(Purchased)) => true,
        (Some(Purchased), Some(Pending)) => true,
        (Some(Pending), Some(Skipped)) => true,
        (Some(Purchased), Some(Skipped)) => true,
        (Some(Skipped), Some(Pending)) => true,
        _ => false,
    };
    if legal {
        Ok(())
    } else {
        Err(InvalidTransition { from, to })
    }
}

/// Planning-view increment: one more needed, and the item joins the active
/// shopping list.
pub fn increment_quantity(item: &Item) -> ItemPatch {
    ItemPatch {
        quantity: Some(item.quantity + 1.0),
        status: Some(Some(ItemStatus::Pending)),
        ..Default::default()
    }
}

/// Planning-view decrement. At one or below this removes the item from the
/// active list: quantity 0 and no status, the master-list-only pairing.
pub fn decrement_quantity(item: &Item) -> ItemPatch {
    if item.quantity <= 1.0 {
        ItemPatch {
            quantity: Some(0.0),
            status: Some(None),
            ..Default::default()
        }
    } else {
        ItemPatch {
            quantity: Some(item.quantity - 1.0),
            ..Default::default()
        }
    }
}

/// Shopping-view action button: pending ⇄ purchased. Items in any other
/// state are left alone (the button is not shown for them).
pub fn toggle_purchased(item: &Item) -> Option<ItemPatch> {
    match item.status {
        Some(ItemStatus::Pending) => Some(ItemPatch::status(Some(ItemStatus::Purchased))),
        Some(ItemStatus::Purchased) => Some(ItemPatch::status(Some(ItemStatus::Pending))),
        _ => None,
    }
}

/// Skip action: pending/purchased → skipped, skipped → pending.
pub fn toggle_skipped(item: &Item) -> Option<ItemPatch> {
    match item.status {
        Some(ItemStatus::Pending) | Some(ItemStatus::Purchased) => {
            Some(ItemPatch::status(Some(ItemStatus::Skipped)))
        }
        Some(ItemStatus::Skipped) => Some(ItemPatch::status(Some(ItemStatus::Pending))),
        None => None,
    }
}

/// The patch that clears an item off the active list.
pub fn clear_from_list() -> ItemPatch {
    ItemPatch {
        quantity: Some(0.0),
        status: Some(None),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::NewItem;
    use chrono::Utc;

    fn item_with(status: Option<ItemStatus>, quantity: f64) -> Item {
        let mut item = NewItem::named("Test").into_item(Utc::now());
        item.status = status;
        item.quantity = quantity;
        item
    }

    #[test]
    fn clears_are_always_legal() {
        for from in [
            None,
            Some(ItemStatus::Pending),
            Some(ItemStatus::Purchased),
            Some(ItemStatus::Skipped),
        ] {
            assert!(validate_transition(from, None).is_ok());
            assert!(validate_transition(from, from).is_ok());
        }
    }

    #[test]
    fn documented_edges_are_legal() {
        use ItemStatus::*;
        for (from, to) in [
            (None, Some(Pending)),
            (Some(Pending), Some(Purchased)),
            (Some(Purchased), Some(Pending)),
            (Some(Pending), Some(Skipped)),
            (Some(Purchased), Some(Skipped)),
            (Some(Skipped), Some(Pending)),
        ] {
            assert!(validate_transition(from, to).is_ok(), "{from:?} -> {to:?}");
        }
    }

    #[test]
    fn undocumented_edges_are_rejected() {
        use ItemStatus::*;
        for (from, to) in [
            (None, Some(Purchased)),
            (None, Some(Skipped)),
            (Some(Skipped), Some(Purchased)),
        ] {
            let err = validate_transition(from, to).unwrap_err();
            assert_eq!(err.from, from);
            assert_eq!(err.to, to);
        }
    }

    #[test]
    fn invalid_transition_message_names_both_states() {
        let err = validate_transition(None, Some(ItemStatus::Purchased)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("none"));
        assert!(msg.contains("purchased"));
    }

    #[test]
    fn increment_adds_one_and_goes_pending() {
        let item = item_with(None, 0.0);
        let patch = increment_quantity(&item);
        assert_eq!(patch.quantity, Some(1.0));
        assert_eq!(patch.status, Some(Some(ItemStatus::Pending)));
    }

    #[test]
    fn decrement_at_one_clears_off_the_list() {
        let item = item_with(Some(ItemStatus::Pending), 1.0);
        let patch = decrement_quantity(&item);
        assert_eq!(patch.quantity, Some(0.0));
        assert_eq!(patch.status, Some(None));
    }

    #[test]
    fn decrement_above_one_only_lowers_quantity() {
        let item = item_with(Some(ItemStatus::Pending), 3.0);
        let patch = decrement_quantity(&item);
        assert_eq!(patch.quantity, Some(2.0));
        assert_eq!(patch.status, None);
    }

    #[test]
    fn purchase_toggle_round_trips() {
        let pending = item_with(Some(ItemStatus::Pending), 1.0);
        let patch = toggle_purchased(&pending).unwrap();
        assert_eq!(patch.status, Some(Some(ItemStatus::Purchased)));

        let purchased = item_with(Some(ItemStatus::Purchased), 1.0);
        let patch = toggle_purchased(&purchased).unwrap();
        assert_eq!(patch.status, Some(Some(ItemStatus::Pending)));

        assert!(toggle_purchased(&item_with(None, 0.0)).is_none());
    }

    #[test]
    fn skip_toggle() {
        let pending = item_with(Some(ItemStatus::Pending), 1.0);
        assert_eq!(
            toggle_skipped(&pending).unwrap().status,
            Some(Some(ItemStatus::Skipped))
        );

        let skipped = item_with(Some(ItemStatus::Skipped), 1.0);
        assert_eq!(
            toggle_skipped(&skipped).unwrap().status,
            Some(Some(ItemStatus::Pending))
        );

        assert!(toggle_skipped(&item_with(None, 0.0)).is_none());
    }
}
