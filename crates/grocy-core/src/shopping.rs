//! # Shopping Module
//!
//! Planning removals from the shopping list.
//!
//! Removing a product reduces its first entry or deletes it outright. An
//! entry is never left at zero or a negative amount: asking for as much as
//! (or more than) the entry holds deletes it.

use crate::{GrocyError, ShoppingListEntry};

/// What to do with a shopping list entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemovalPlan {
    /// `DELETE /objects/shopping_list/{entry_id}`.
    Delete { entry_id: u64 },
    /// `PUT /objects/shopping_list/{entry_id}` with the new amount.
    Reduce { entry_id: u64, new_amount: f64 },
}

/// First entry for `product_id` on any shopping list.
#[must_use]
pub fn find_entry(entries: &[ShoppingListEntry], product_id: u64) -> Option<&ShoppingListEntry> {
    entries.iter().find(|e| e.product_id == Some(product_id))
}

/// Plan removing `amount` from `entry`; `None` removes the whole entry.
pub fn plan_removal(
    entry: &ShoppingListEntry,
    amount: Option<f64>,
) -> Result<RemovalPlan, GrocyError> {
    let Some(amount) = amount else {
        return Ok(RemovalPlan::Delete { entry_id: entry.id });
    };
    if !amount.is_finite() || amount <= 0.0 {
        return Err(GrocyError::InvalidArgument(format!(
            "amount must be a positive number, got {amount}"
        )));
    }

    let new_amount = entry.amount - amount;
    if new_amount <= 0.0 {
        Ok(RemovalPlan::Delete { entry_id: entry.id })
    } else {
        Ok(RemovalPlan::Reduce {
            entry_id: entry.id,
            new_amount,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, product_id: Option<u64>, amount: f64) -> ShoppingListEntry {
        ShoppingListEntry {
            id,
            product_id,
            shopping_list_id: Some(1),
            amount,
            note: None,
        }
    }

    #[test]
    fn find_entry_skips_free_text_items() {
        let entries = vec![entry(1, None, 1.0), entry(2, Some(9), 3.0), entry(3, Some(9), 1.0)];
        assert_eq!(find_entry(&entries, 9).map(|e| e.id), Some(2));
        assert!(find_entry(&entries, 10).is_none());
    }

    #[test]
    fn partial_removal_reduces() {
        let plan = plan_removal(&entry(5, Some(9), 3.0), Some(1.0)).expect("plan");
        assert_eq!(
            plan,
            RemovalPlan::Reduce {
                entry_id: 5,
                new_amount: 2.0
            }
        );
    }

    #[test]
    fn removing_everything_or_more_deletes() {
        assert_eq!(
            plan_removal(&entry(5, Some(9), 3.0), Some(3.0)),
            Ok(RemovalPlan::Delete { entry_id: 5 })
        );
        assert_eq!(
            plan_removal(&entry(5, Some(9), 3.0), Some(10.0)),
            Ok(RemovalPlan::Delete { entry_id: 5 })
        );
    }

    #[test]
    fn missing_amount_deletes_whole_entry() {
        assert_eq!(
            plan_removal(&entry(5, Some(9), 3.0), None),
            Ok(RemovalPlan::Delete { entry_id: 5 })
        );
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        assert!(plan_removal(&entry(5, Some(9), 3.0), Some(0.0)).is_err());
        assert!(plan_removal(&entry(5, Some(9), 3.0), Some(-1.0)).is_err());
    }
}
