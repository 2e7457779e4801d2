//! Recipe reads and the composite recipe tools.
//!
//! The composite tools fetch everything they need up front, then write one
//! item at a time so a failing item is reported instead of aborting the call.

use super::{ToolReply, ToolResult};
use crate::client::GrocyClient;
use crate::params::{CreateRecipeParams, IngredientSpec, RecipeIdParams, RecipeServingsParams};
use grocy_core::shortfall::{DEFAULT_SERVINGS, missing_ingredients};
use grocy_core::types::{positive, positive_or};
use grocy_core::{
    GrocyError, IngredientDetail, ItemStatus, NewRecipe, NewRecipePosition, NewShoppingListItem,
    Product, QuantityUnit, RecipeCreationReport, RecipeStockStatus, ShortfallDetail,
    ShortfallReport, convert,
};
use std::collections::BTreeMap;

// =============================================================================
// PASS-THROUGH
// =============================================================================

pub async fn get_recipes(client: &GrocyClient) -> ToolResult {
    Ok(ToolReply::Json(client.recipes().await?))
}

pub async fn get_recipe_fulfillment(client: &GrocyClient, p: RecipeIdParams) -> ToolResult {
    Ok(ToolReply::Json(client.recipe_fulfillment(p.recipe_id).await?))
}

pub async fn consume_recipe(client: &GrocyClient, p: RecipeIdParams) -> ToolResult {
    client.consume_recipe(p.recipe_id).await?;
    Ok(ToolReply::message(format!(
        "Successfully consumed recipe {}",
        p.recipe_id
    )))
}

pub async fn add_recipe_to_shopping_list(client: &GrocyClient, p: RecipeIdParams) -> ToolResult {
    client.add_recipe_to_shopping_list(p.recipe_id).await?;
    Ok(ToolReply::message(format!(
        "Successfully added recipe {} to shopping list",
        p.recipe_id
    )))
}

// =============================================================================
// CREATE WITH INGREDIENTS
// =============================================================================

/// Products and units needed to convert ingredient amounts.
struct UnitCatalog {
    source_unit: String,
    products: BTreeMap<u64, Product>,
    units: BTreeMap<u64, QuantityUnit>,
}

impl UnitCatalog {
    async fn fetch(client: &GrocyClient, source_unit: String) -> Result<Self, super::ToolError> {
        let products = client.products().await?;
        let units = client.quantity_units().await?;
        Ok(Self {
            source_unit,
            products: products.into_iter().map(|p| (p.id, p)).collect(),
            units: units.into_iter().map(|u| (u.id, u)).collect(),
        })
    }

    /// Amount in the product's stock unit plus the conversion note, if any.
    fn resolve(&self, product_id: u64, amount: f64) -> Result<(f64, Option<String>), GrocyError> {
        let product = self
            .products
            .get(&product_id)
            .ok_or(GrocyError::ProductNotFound(product_id))?;
        let Some(stock_unit) = product.qu_id_stock.and_then(|id| self.units.get(&id)) else {
            return Ok((amount, None));
        };
        let conversion = convert(amount, &self.source_unit, &stock_unit.name);
        Ok((conversion.amount, Some(conversion.note)))
    }
}

fn position(
    recipe_id: u64,
    ingredient: &IngredientSpec,
    amount: f64,
    conversion: Option<&str>,
) -> NewRecipePosition {
    let own = ingredient.note.as_deref().unwrap_or_default();
    let note = match conversion {
        Some(c) => format!("{own} {c}"),
        None => own.to_string(),
    };
    NewRecipePosition {
        recipe_id,
        product_id: ingredient.product_id,
        amount,
        note: note.trim().to_string(),
        only_check_single_unit_in_stock: ingredient.only_check_single_unit_in_stock.unwrap_or(false),
    }
}

/// Create the recipe, then add each ingredient, converting amounts from
/// `source_unit` into each product's stock unit when given.
pub async fn create_recipe_with_ingredients(
    client: &GrocyClient,
    p: CreateRecipeParams,
) -> ToolResult {
    let name = p.recipe.name.trim().to_string();
    if name.is_empty() {
        return Err(GrocyError::InvalidArgument("recipe name must not be empty".to_string()).into());
    }
    let base_servings = positive_or(p.recipe.base_servings, 1.0, "base_servings")?;

    let catalog = match p.source_unit.filter(|u| !u.trim().is_empty()) {
        Some(unit) => Some(UnitCatalog::fetch(client, unit).await?),
        None => None,
    };

    let created = client
        .create_recipe(&NewRecipe {
            name: name.clone(),
            description: p.recipe.description.unwrap_or_default(),
            base_servings,
        })
        .await?;
    let recipe_id = created.created_object_id;
    tracing::debug!(recipe_id, ingredients = p.ingredients.len(), "Recipe created");

    let mut details = Vec::with_capacity(p.ingredients.len());
    for ingredient in &p.ingredients {
        let product_id = ingredient.product_id;
        let resolved = positive(ingredient.amount, "amount").and_then(|amount| match &catalog {
            Some(catalog) => catalog.resolve(product_id, amount),
            None => Ok((amount, None)),
        });
        let (amount, conversion) = match resolved {
            Ok(resolved) => resolved,
            Err(e) => {
                details.push(IngredientDetail::failed(product_id, e.to_string()));
                continue;
            }
        };

        let body = position(recipe_id, ingredient, amount, conversion.as_deref());
        let detail = match client.create_recipe_position(&body).await {
            Ok(_) => IngredientDetail::added(product_id, conversion),
            Err(e) => IngredientDetail::failed(product_id, e.to_string()),
        };
        details.push(detail);
    }

    ToolReply::json(&RecipeCreationReport::new(recipe_id, name, details))
}

// =============================================================================
// SHORTFALL
// =============================================================================

/// Put every short ingredient of a recipe on the shopping list.
pub async fn add_recipe_missing_to_shopping_list(
    client: &GrocyClient,
    list_id: u64,
    p: RecipeServingsParams,
) -> ToolResult {
    let servings = positive_or(p.servings, DEFAULT_SERVINGS, "servings")?;

    // Fails with Grocy's own error when the recipe does not exist.
    client.recipe_fulfillment(p.recipe_id).await?;
    let positions = client.recipe_positions().await?;
    let stock = client.stock_levels().await?;

    let note = format!("For recipe ({servings} servings)");
    let mut details = Vec::new();
    for (ingredient, shortfall) in missing_ingredients(p.recipe_id, &positions, &stock, servings) {
        let item = NewShoppingListItem {
            product_id: ingredient.product_id,
            shopping_list_id: list_id,
            amount: shortfall.missing,
            note: Some(note.clone()),
        };
        let (status, added_to_list, error) = match client.add_shopping_list_item(&item).await {
            Ok(_) => (ItemStatus::Added, Some(shortfall.missing), None),
            Err(e) => (ItemStatus::Failed, None, Some(e.to_string())),
        };
        details.push(ShortfallDetail {
            product_id: ingredient.product_id,
            needed: shortfall.needed,
            in_stock: shortfall.in_stock,
            status,
            added_to_list,
            error,
        });
    }

    ToolReply::json(&ShortfallReport::new(p.recipe_id, servings, details))
}

/// Read-only stock check of every ingredient.
pub async fn get_recipe_with_stock_status(
    client: &GrocyClient,
    p: RecipeServingsParams,
) -> ToolResult {
    let servings = positive_or(p.servings, DEFAULT_SERVINGS, "servings")?;

    let recipe = client
        .recipe(p.recipe_id)
        .await?
        .ok_or(GrocyError::RecipeNotFound(p.recipe_id))?;
    let positions = client.recipe_positions().await?;
    let products: BTreeMap<u64, Product> = client
        .products()
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();
    let stock = client.stock_levels().await?;

    ToolReply::json(&RecipeStockStatus::evaluate(
        &recipe, &positions, &products, &stock, servings,
    ))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> UnitCatalog {
        let product = |id, unit| Product {
            id,
            name: format!("product {id}"),
            qu_id_stock: unit,
            product_group_id: None,
        };
        let unit = |id, name: &str| QuantityUnit {
            id,
            name: name.to_string(),
        };
        UnitCatalog {
            source_unit: "g".to_string(),
            products: [(1, product(1, Some(10))), (2, product(2, Some(11))), (3, product(3, None))]
                .into_iter()
                .collect(),
            units: [(10, unit(10, "kg")), (11, unit(11, "ml"))]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn resolve_converts_mass_units() {
        let (amount, note) = catalog().resolve(1, 2500.0).expect("resolve");
        assert_eq!(amount, 2.5);
        assert_eq!(note.as_deref(), Some("(2500g → 2.5kg)"));
    }

    #[test]
    fn resolve_passes_through_other_units() {
        let (amount, note) = catalog().resolve(2, 200.0).expect("resolve");
        assert_eq!(amount, 200.0);
        assert_eq!(note.as_deref(), Some("(no conversion: g → ml)"));
    }

    #[test]
    fn resolve_without_stock_unit_adds_no_note() {
        assert_eq!(catalog().resolve(3, 5.0), Ok((5.0, None)));
    }

    #[test]
    fn resolve_unknown_product_fails() {
        assert_eq!(
            catalog().resolve(99, 1.0),
            Err(GrocyError::ProductNotFound(99))
        );
    }

    #[test]
    fn position_note_joins_own_note_and_conversion() {
        let ingredient = IngredientSpec {
            product_id: 1,
            amount: 2500.0,
            note: Some("sifted".to_string()),
            only_check_single_unit_in_stock: None,
        };
        let body = position(7, &ingredient, 2.5, Some("(2500g → 2.5kg)"));
        assert_eq!(body.note, "sifted (2500g → 2.5kg)");
        assert!(!body.only_check_single_unit_in_stock);

        let plain = IngredientSpec {
            note: None,
            ..ingredient
        };
        assert_eq!(position(7, &plain, 1.0, Some("(1g)")).note, "(1g)");
        assert_eq!(position(7, &plain, 1.0, None).note, "");
    }
}
