//! # Batch Module
//!
//! Reports for tools that write several items in one call.
//!
//! Each item is attempted on its own; a failing item is recorded and the
//! batch continues. Reports carry succeeded/failed counts plus one detail
//! record per item, in request order.

use serde::Serialize;

/// Outcome of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Added,
    Failed,
}

/// A per-item detail record that knows its outcome.
pub trait Outcome {
    fn status(&self) -> ItemStatus;
}

/// Count `(added, failed)` details.
pub fn tally<T: Outcome>(details: &[T]) -> (usize, usize) {
    let added = details
        .iter()
        .filter(|d| d.status() == ItemStatus::Added)
        .count();
    (added, details.len() - added)
}

// =============================================================================
// BULK ADD TO SHOPPING LIST
// =============================================================================

/// One item of `bulk_add_to_shopping_list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkAddDetail {
    pub product_id: u64,
    pub amount: f64,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BulkAddDetail {
    #[must_use]
    pub fn added(product_id: u64, amount: f64, entry_id: u64) -> Self {
        Self {
            product_id,
            amount,
            status: ItemStatus::Added,
            entry_id: Some(entry_id),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(product_id: u64, amount: f64, error: impl Into<String>) -> Self {
        Self {
            product_id,
            amount,
            status: ItemStatus::Failed,
            entry_id: None,
            error: Some(error.into()),
        }
    }
}

impl Outcome for BulkAddDetail {
    fn status(&self) -> ItemStatus {
        self.status
    }
}

/// Result payload of `bulk_add_to_shopping_list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkAddReport {
    pub items_requested: usize,
    pub items_added: usize,
    pub items_failed: usize,
    pub details: Vec<BulkAddDetail>,
}

impl BulkAddReport {
    #[must_use]
    pub fn from_details(details: Vec<BulkAddDetail>) -> Self {
        let (items_added, items_failed) = tally(&details);
        Self {
            items_requested: details.len(),
            items_added,
            items_failed,
            details,
        }
    }
}

// =============================================================================
// RECIPE CREATION
// =============================================================================

/// One ingredient of `create_recipe_with_ingredients`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientDetail {
    pub product_id: u64,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IngredientDetail {
    #[must_use]
    pub fn added(product_id: u64, conversion: Option<String>) -> Self {
        Self {
            product_id,
            status: ItemStatus::Added,
            conversion,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(product_id: u64, error: impl Into<String>) -> Self {
        Self {
            product_id,
            status: ItemStatus::Failed,
            conversion: None,
            error: Some(error.into()),
        }
    }
}

impl Outcome for IngredientDetail {
    fn status(&self) -> ItemStatus {
        self.status
    }
}

/// Result payload of `create_recipe_with_ingredients`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeCreationReport {
    pub recipe_id: u64,
    pub recipe_name: String,
    pub ingredients_added: usize,
    pub ingredients_failed: usize,
    pub details: Vec<IngredientDetail>,
}

impl RecipeCreationReport {
    #[must_use]
    pub fn new(recipe_id: u64, recipe_name: String, details: Vec<IngredientDetail>) -> Self {
        let (ingredients_added, ingredients_failed) = tally(&details);
        Self {
            recipe_id,
            recipe_name,
            ingredients_added,
            ingredients_failed,
            details,
        }
    }
}

// =============================================================================
// RECIPE SHORTFALL
// =============================================================================

/// One short ingredient of `add_recipe_missing_to_shopping_list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortfallDetail {
    pub product_id: u64,
    pub needed: f64,
    pub in_stock: f64,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_to_list: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome for ShortfallDetail {
    fn status(&self) -> ItemStatus {
        self.status
    }
}

/// Result payload of `add_recipe_missing_to_shopping_list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortfallReport {
    pub recipe_id: u64,
    pub servings: f64,
    pub items_added: usize,
    pub items_failed: usize,
    pub details: Vec<ShortfallDetail>,
}

impl ShortfallReport {
    #[must_use]
    pub fn new(recipe_id: u64, servings: f64, details: Vec<ShortfallDetail>) -> Self {
        let (items_added, items_failed) = tally(&details);
        Self {
            recipe_id,
            servings,
            items_added,
            items_failed,
            details,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
