//! # Core Type Definitions
//!
//! Grocy records as the bridge reads them, the payloads it writes, and the
//! crate's error type.
//!
//! Records only declare the fields some tool actually uses. Unknown fields
//! are ignored on decode; numeric fields go through [`crate::lenient`].

use crate::lenient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// PRODUCTS & UNITS
// =============================================================================

/// A product definition (`/objects/products`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    pub name: String,
    /// Quantity unit the stock of this product is kept in.
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub qu_id_stock: Option<u64>,
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub product_group_id: Option<u64>,
}

/// A quantity unit (`/objects/quantity_units`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityUnit {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    pub name: String,
}

/// A product group (`/objects/product_groups`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductGroup {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    pub name: String,
}

// =============================================================================
// STOCK
// =============================================================================

/// One row of the stock overview (`GET /stock`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEntry {
    #[serde(deserialize_with = "lenient::id")]
    pub product_id: u64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: f64,
    /// Amount including sub-products of a parent product.
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount_aggregated: f64,
    #[serde(default)]
    pub best_before_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_aggregated_amount: bool,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub last_price: Option<f64>,
    #[serde(default)]
    pub product: Option<Product>,
}

/// Stock rows indexed by product id.
///
/// A product without a stock row has nothing in stock.
#[derive(Debug, Clone, Default)]
pub struct StockLevels {
    entries: BTreeMap<u64, StockEntry>,
}

impl StockLevels {
    /// Index the rows of `GET /stock`. Later rows win on duplicate ids.
    #[must_use]
    pub fn from_entries(entries: Vec<StockEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.product_id, e)).collect(),
        }
    }

    /// The stock row of a product, if it has one.
    #[must_use]
    pub fn entry(&self, product_id: u64) -> Option<&StockEntry> {
        self.entries.get(&product_id)
    }

    /// Aggregated amount in stock; 0 when the product has no row.
    #[must_use]
    pub fn aggregated(&self, product_id: u64) -> f64 {
        self.entry(product_id).map_or(0.0, |e| e.amount_aggregated)
    }
}

// =============================================================================
// STOCK ACTIONS
// =============================================================================

/// Best-before date sent with `add_product` when the caller gives none.
pub const NEVER_EXPIRES: &str = "2099-12-31";

/// Payload for `POST /stock/products/{id}/add`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddStock {
    pub amount: f64,
    pub best_before_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Payload for `POST /stock/products/{id}/consume`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumeStock {
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spoiled: Option<bool>,
}

/// Payload for `POST /stock/products/{id}/transfer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferStock {
    pub amount: f64,
    pub location_id_from: u64,
    pub location_id_to: u64,
}

/// Payload for `POST /stock/products/{id}/inventory`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryStock {
    pub new_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_before_date: Option<String>,
}

/// Payload for `POST /stock/products/{id}/open`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenStock {
    pub amount: f64,
}

/// Payload for executing a chore or charging a battery.
///
/// Grocy uses the current time when `tracked_time` is omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackedTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracked_time: Option<String>,
}

// =============================================================================
// SHOPPING LIST
// =============================================================================

/// An item on a shopping list (`/objects/shopping_list`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListEntry {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    /// `None` for free-text items.
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub product_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub shopping_list_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: f64,
    #[serde(default)]
    pub note: Option<String>,
}

/// Payload for `POST /objects/shopping_list`.
///
/// Written through the generic objects endpoint because
/// `/stock/shoppinglist/add-product` ignores the amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewShoppingListItem {
    pub product_id: u64,
    pub shopping_list_id: u64,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Payload for `PUT /objects/shopping_list/{id}` when only the amount changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmountUpdate {
    pub amount: f64,
}

// =============================================================================
// RECIPES
// =============================================================================

/// A recipe (`/objects/recipes`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    pub name: String,
}

/// A recipe ingredient (`/objects/recipes_pos`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipePosition {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(deserialize_with = "lenient::id")]
    pub recipe_id: u64,
    #[serde(deserialize_with = "lenient::id")]
    pub product_id: u64,
    /// Amount for the recipe's base servings, in the product's stock unit.
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: f64,
    #[serde(default)]
    pub note: Option<String>,
}

/// Payload for `POST /objects/recipes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRecipe {
    pub name: String,
    pub description: String,
    pub base_servings: f64,
}

/// Payload for `POST /objects/recipes_pos`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRecipePosition {
    pub recipe_id: u64,
    pub product_id: u64,
    pub amount: f64,
    pub note: String,
    pub only_check_single_unit_in_stock: bool,
}

/// Response of `POST /objects/{entity}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedObject {
    #[serde(deserialize_with = "lenient::id")]
    pub created_object_id: u64,
}

// =============================================================================
// ENTITY NAMES
// =============================================================================

/// A validated Grocy entity name (`products`, `recipes_pos`, ...).
///
/// Entity names are interpolated into request paths, so only lowercase
/// ASCII letters, digits and `_` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityName(String);

impl EntityName {
    /// Validate a caller-supplied entity name.
    pub fn parse(name: &str) -> Result<Self, GrocyError> {
        let valid = !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
        if valid {
            Ok(Self(name.to_string()))
        } else {
            Err(GrocyError::InvalidArgument(format!(
                "invalid entity name {name:?}: expected lowercase letters, digits or '_'"
            )))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// ARGUMENT VALIDATION
// =============================================================================

/// Require a finite quantity greater than zero.
pub fn positive(value: f64, what: &str) -> Result<f64, GrocyError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GrocyError::InvalidArgument(format!(
            "{what} must be a positive number, got {value}"
        )))
    }
}

/// Resolve an optional positive quantity, applying `default` when absent.
pub fn positive_or(value: Option<f64>, default: f64, what: &str) -> Result<f64, GrocyError> {
    positive(value.unwrap_or(default), what)
}

/// Require a finite quantity of zero or more (inventory corrections may
/// set stock to zero).
pub fn non_negative(value: f64, what: &str) -> Result<f64, GrocyError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(GrocyError::InvalidArgument(format!(
            "{what} must be zero or more, got {value}"
        )))
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the bridge's own logic, as opposed to the Grocy server.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrocyError {
    /// A tool argument is well-typed but semantically invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    /// A referenced recipe does not exist.
    #[error("Recipe not found: {0}")]
    RecipeNotFound(u64),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_levels_default_to_zero() {
        let rows: Vec<StockEntry> = serde_json::from_str(
            r#"[{"product_id": 1, "amount": 2, "amount_aggregated": 4, "best_before_date": "2025-01-01"}]"#,
        )
        .expect("stock rows");
        let levels = StockLevels::from_entries(rows);

        assert_eq!(levels.aggregated(1), 4.0);
        assert_eq!(levels.aggregated(2), 0.0);
        assert!(levels.entry(2).is_none());
    }

    #[test]
    fn stock_entry_decodes_nested_product() {
        let row: StockEntry = serde_json::from_str(
            r#"{"product_id": "3", "amount": "1.5", "amount_aggregated": "1.5",
                "is_aggregated_amount": "0",
                "product": {"id": "3", "name": "Flour", "qu_id_stock": "2", "product_group_id": ""}}"#,
        )
        .expect("stock row");

        let product = row.product.expect("product");
        assert_eq!(product.name, "Flour");
        assert_eq!(product.qu_id_stock, Some(2));
        assert_eq!(product.product_group_id, None);
        assert!(!row.is_aggregated_amount);
    }

    #[test]
    fn entity_names_reject_path_segments() {
        assert!(EntityName::parse("recipes_pos").is_ok());
        assert!(EntityName::parse("products").is_ok());
        assert!(EntityName::parse("").is_err());
        assert!(EntityName::parse("../system").is_err());
        assert!(EntityName::parse("Products").is_err());
        assert!(EntityName::parse("products/1").is_err());
    }

    #[test]
    fn positive_or_applies_default() {
        assert_eq!(positive_or(None, 1.0, "amount"), Ok(1.0));
        assert_eq!(positive_or(Some(2.5), 1.0, "amount"), Ok(2.5));
        assert!(positive_or(Some(0.0), 1.0, "amount").is_err());
        assert!(positive_or(Some(-3.0), 1.0, "amount").is_err());
        assert!(positive_or(Some(f64::NAN), 1.0, "amount").is_err());
    }

    #[test]
    fn non_negative_allows_zero() {
        assert_eq!(non_negative(0.0, "new_amount"), Ok(0.0));
        assert!(non_negative(-0.5, "new_amount").is_err());
        assert!(positive(0.0, "amount").is_err());
    }

    #[test]
    fn add_stock_omits_missing_price() {
        let body = AddStock {
            amount: 2.0,
            best_before_date: NEVER_EXPIRES.to_string(),
            price: None,
        };
        assert_eq!(
            serde_json::to_value(&body).expect("json"),
            serde_json::json!({"amount": 2.0, "best_before_date": "2099-12-31"})
        );
        assert_eq!(
            serde_json::to_value(TrackedTime::default()).expect("json"),
            serde_json::json!({})
        );
    }

    #[test]
    fn new_shopping_list_item_omits_missing_note() {
        let item = NewShoppingListItem {
            product_id: 4,
            shopping_list_id: 1,
            amount: 2.0,
            note: None,
        };
        let json = serde_json::to_value(&item).expect("json");
        assert_eq!(json, serde_json::json!({"product_id": 4, "shopping_list_id": 1, "amount": 2.0}));
    }
}
