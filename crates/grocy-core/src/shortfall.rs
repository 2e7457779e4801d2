//! # Shortfall Module
//!
//! What a recipe needs at a given number of servings versus what is in stock.
//!
//! - needed = ingredient amount × servings
//! - missing = max(0, needed − aggregated stock)
//! - fulfilled = stock ≥ needed
//!
//! Shared by `get_recipe_with_stock_status` (read-only report) and
//! `add_recipe_missing_to_shopping_list` (adds every `missing > 0`).

use crate::{Product, Recipe, RecipePosition, StockLevels};
use serde::Serialize;
use std::collections::BTreeMap;

/// Servings used when the caller does not give any.
pub const DEFAULT_SERVINGS: f64 = 1.0;

/// Requirement of one ingredient against current stock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shortfall {
    pub needed: f64,
    pub in_stock: f64,
    pub missing: f64,
}

impl Shortfall {
    #[must_use]
    pub fn compute(amount: f64, servings: f64, in_stock: f64) -> Self {
        let needed = amount * servings;
        Self {
            needed,
            in_stock,
            missing: (needed - in_stock).max(0.0),
        }
    }

    #[must_use]
    pub fn is_fulfilled(&self) -> bool {
        self.in_stock >= self.needed
    }
}

/// Ingredients of `recipe_id` that are short, paired with their shortfall.
#[must_use]
pub fn missing_ingredients<'a>(
    recipe_id: u64,
    positions: &'a [RecipePosition],
    stock: &StockLevels,
    servings: f64,
) -> Vec<(&'a RecipePosition, Shortfall)> {
    positions
        .iter()
        .filter(|p| p.recipe_id == recipe_id)
        .map(|p| {
            (
                p,
                Shortfall::compute(p.amount, servings, stock.aggregated(p.product_id)),
            )
        })
        .filter(|(_, s)| s.missing > 0.0)
        .collect()
}

/// Stock status of one ingredient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientStatus {
    pub product_id: u64,
    pub product_name: String,
    pub amount_needed: f64,
    pub amount_in_stock: f64,
    pub fulfilled: bool,
    pub missing: f64,
    pub note: String,
}

/// Result payload of `get_recipe_with_stock_status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeStockStatus {
    pub recipe_id: u64,
    pub recipe_name: String,
    pub servings: f64,
    pub can_make: bool,
    pub missing_ingredients_count: usize,
    pub ingredients: Vec<IngredientStatus>,
}

impl RecipeStockStatus {
    /// Evaluate every ingredient of `recipe` against `stock`.
    ///
    /// `positions` may hold other recipes' ingredients; they are skipped.
    /// Products absent from `products` are reported as "Unknown".
    #[must_use]
    pub fn evaluate(
        recipe: &Recipe,
        positions: &[RecipePosition],
        products: &BTreeMap<u64, Product>,
        stock: &StockLevels,
        servings: f64,
    ) -> Self {
        let ingredients: Vec<IngredientStatus> = positions
            .iter()
            .filter(|p| p.recipe_id == recipe.id)
            .map(|p| {
                let s = Shortfall::compute(p.amount, servings, stock.aggregated(p.product_id));
                IngredientStatus {
                    product_id: p.product_id,
                    product_name: products
                        .get(&p.product_id)
                        .map_or_else(|| "Unknown".to_string(), |pr| pr.name.clone()),
                    amount_needed: s.needed,
                    amount_in_stock: s.in_stock,
                    fulfilled: s.is_fulfilled(),
                    missing: s.missing,
                    note: p.note.clone().unwrap_or_default(),
                }
            })
            .collect();

        let missing_ingredients_count = ingredients.iter().filter(|i| !i.fulfilled).count();

        Self {
            recipe_id: recipe.id,
            recipe_name: recipe.name.clone(),
            servings,
            can_make: missing_ingredients_count == 0,
            missing_ingredients_count,
            ingredients,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
