//! # Tool Parameter Structs
//!
//! One record per tool argument shape. Field docs become the JSON Schema
//! descriptions clients see in `tools/list`; non-`Option` fields are
//! required. Arguments that do not fit a record are rejected by the router
//! before any handler runs.

use rmcp::schemars;
use serde::Deserialize;
use serde_json::{Map, Value};

// =============================================================================
// STOCK
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProductIdParams {
    #[schemars(description = "Product ID")]
    pub product_id: u64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddProductParams {
    #[schemars(description = "Product ID to add stock for")]
    pub product_id: u64,
    #[schemars(description = "Amount to add")]
    pub amount: f64,
    /// Defaults to 2099-12-31 (never expires).
    #[schemars(description = "Best before date (YYYY-MM-DD, optional)")]
    pub best_before_date: Option<String>,
    #[schemars(description = "Price per unit (optional)")]
    pub price: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConsumeProductParams {
    #[schemars(description = "Product ID to consume")]
    pub product_id: u64,
    #[schemars(description = "Amount to consume")]
    pub amount: f64,
    #[schemars(description = "Mark as spoiled (optional)")]
    pub spoiled: Option<bool>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TransferProductParams {
    #[schemars(description = "Product ID to transfer")]
    pub product_id: u64,
    #[schemars(description = "Amount to transfer")]
    pub amount: f64,
    #[schemars(description = "Source location ID")]
    pub location_id_from: u64,
    #[schemars(description = "Destination location ID")]
    pub location_id_to: u64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct InventoryProductParams {
    #[schemars(description = "Product ID")]
    pub product_id: u64,
    #[schemars(description = "New absolute stock amount")]
    pub new_amount: f64,
    #[schemars(description = "Best before date (YYYY-MM-DD, optional)")]
    pub best_before_date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct OpenProductParams {
    #[schemars(description = "Product ID to open")]
    pub product_id: u64,
    #[schemars(description = "Amount to open (default: 1)")]
    pub amount: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BarcodeParams {
    #[schemars(description = "Product barcode")]
    pub barcode: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchProductsParams {
    #[schemars(description = "Search term (case-insensitive substring of the product name)")]
    pub query: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MatchProductParams {
    #[schemars(description = "Product name to search for")]
    pub name: String,
    #[schemars(description = "Enable fuzzy word matching (default: true)")]
    pub fuzzy: Option<bool>,
    #[schemars(description = "Maximum results to return (default: 5)")]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BulkStockParams {
    #[schemars(description = "Array of product IDs to check")]
    pub product_ids: Vec<u64>,
}

// =============================================================================
// GENERIC ENTITIES
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateEntityParams {
    #[schemars(
        description = "Entity type (e.g. 'products', 'locations', 'recipes', 'chores', 'tasks', 'batteries', 'quantity_units', 'shopping_locations')"
    )]
    pub entity: String,
    #[schemars(description = "Entity data as JSON object")]
    pub data: Map<String, Value>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateEntityParams {
    #[schemars(description = "Entity type (e.g. 'products', 'locations', 'recipes', 'chores')")]
    pub entity: String,
    #[schemars(description = "Entity ID to update")]
    pub object_id: u64,
    #[schemars(description = "Updated fields as JSON object")]
    pub data: Map<String, Value>,
}

/// Shared by `get_entity`, `delete_entity` and `get_userfields`.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EntityObjectParams {
    #[schemars(description = "Entity type (e.g. 'products', 'locations', 'recipes')")]
    pub entity: String,
    #[schemars(description = "Entity ID")]
    pub object_id: u64,
}

// =============================================================================
// SHOPPING LIST
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddToShoppingListParams {
    #[schemars(description = "Product ID to add")]
    pub product_id: u64,
    #[schemars(description = "Quantity to add (default: 1)")]
    pub amount: Option<f64>,
    #[schemars(description = "Optional note for this item")]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveFromShoppingListParams {
    #[schemars(description = "Product ID to remove")]
    pub product_id: u64,
    #[schemars(description = "Quantity to remove (default: removes the whole entry)")]
    pub amount: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ShoppingItem {
    #[schemars(description = "Product ID")]
    pub product_id: u64,
    #[schemars(description = "Quantity")]
    pub amount: f64,
    #[schemars(description = "Optional note")]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BulkAddParams {
    #[schemars(description = "Array of items to add")]
    pub items: Vec<ShoppingItem>,
}

// =============================================================================
// RECIPES
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecipeIdParams {
    #[schemars(description = "Recipe ID")]
    pub recipe_id: u64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecipeServingsParams {
    #[schemars(description = "Recipe ID")]
    pub recipe_id: u64,
    #[schemars(description = "Number of servings to calculate for (default: 1)")]
    pub servings: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecipeSpec {
    #[schemars(description = "Recipe name")]
    pub name: String,
    #[schemars(description = "Recipe description/instructions")]
    pub description: Option<String>,
    #[schemars(description = "Base servings (default: 1)")]
    pub base_servings: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientSpec {
    #[schemars(description = "Product ID")]
    pub product_id: u64,
    #[schemars(
        description = "Amount needed in source_unit (or the product's stock unit if source_unit is not given)"
    )]
    pub amount: f64,
    #[schemars(description = "Optional note")]
    pub note: Option<String>,
    #[schemars(description = "Check single unit only")]
    pub only_check_single_unit_in_stock: Option<bool>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateRecipeParams {
    #[schemars(description = "Recipe data (name, description, base_servings)")]
    pub recipe: RecipeSpec,
    #[schemars(description = "Array of ingredients")]
    pub ingredients: Vec<IngredientSpec>,
    #[schemars(
        description = "Optional: unit the amounts are given in (e.g. 'g', 'kg', 'oz', 'lb'). Amounts are converted to each product's stock unit."
    )]
    pub source_unit: Option<String>,
}

// =============================================================================
// CHORES, TASKS, BATTERIES
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ChoreIdParams {
    #[schemars(description = "Chore ID")]
    pub chore_id: u64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExecuteChoreParams {
    #[schemars(description = "Chore ID to execute")]
    pub chore_id: u64,
    #[schemars(description = "Execution timestamp (optional, ISO format)")]
    pub tracked_time: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TaskIdParams {
    #[schemars(description = "Task ID to complete")]
    pub task_id: u64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BatteryIdParams {
    #[schemars(description = "Battery ID")]
    pub battery_id: u64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ChargeBatteryParams {
    #[schemars(description = "Battery ID to charge")]
    pub battery_id: u64,
    #[schemars(description = "Charge timestamp (optional, ISO format)")]
    pub tracked_time: Option<String>,
}

// =============================================================================
// BREWING
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BrewingParams {
    #[schemars(
        description = "Optional: filter by product group name (e.g. 'Brewing', 'Hops', 'Grains')"
    )]
    pub product_group_filter: Option<String>,
    #[schemars(
        description = "If true, include all products. If false (default), only products with pricing data."
    )]
    pub include_all_products: Option<bool>,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn optional_fields_may_be_omitted() {
        let p: AddToShoppingListParams =
            serde_json::from_value(json!({"product_id": 3})).expect("params");
        assert_eq!(p.product_id, 3);
        assert!(p.amount.is_none());
        assert!(p.note.is_none());
    }

    #[test]
    fn required_fields_are_enforced() {
        assert!(serde_json::from_value::<AddProductParams>(json!({"product_id": 1})).is_err());
        assert!(
            serde_json::from_value::<ProductIdParams>(json!({"product_id": "one"})).is_err()
        );
    }

    #[test]
    fn nested_recipe_arguments() {
        let p: CreateRecipeParams = serde_json::from_value(json!({
            "recipe": {"name": "Bread"},
            "ingredients": [{"product_id": 1, "amount": 500}],
            "source_unit": "g"
        }))
        .expect("params");
        assert_eq!(p.recipe.name, "Bread");
        assert_eq!(p.ingredients[0].amount, 500.0);
        assert_eq!(p.source_unit.as_deref(), Some("g"));
    }

    #[test]
    fn entity_data_must_be_an_object() {
        assert!(
            serde_json::from_value::<CreateEntityParams>(json!({"entity": "products", "data": [1]}))
                .is_err()
        );
    }

    #[test]
    fn schema_marks_required_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(AddProductParams)).expect("schema");
        let required = schema["required"].as_array().expect("required list");
        assert!(required.contains(&json!("product_id")));
        assert!(required.contains(&json!("amount")));
        assert!(!required.contains(&json!("price")));
    }
}
