//! # Brewing Module
//!
//! Ingredient export for brewing software (BeerSmith-style ingredient lists).
//!
//! Grocy product groups are free text; they are folded into the handful of
//! categories brewing tools know about.

use crate::{Product, ProductGroup, QuantityUnit, StockLevels};
use serde::Serialize;
use std::collections::BTreeMap;

/// Map a product group name to a brewing category.
///
/// `None` (no group) maps to `other`; unrecognised names map to themselves,
/// lowercased.
#[must_use]
pub fn category_hint(group_name: Option<&str>) -> String {
    let Some(name) = group_name else {
        return "other".to_string();
    };
    let lower = name.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if has(&["hop"]) {
        "hops".to_string()
    } else if has(&["grain", "malt", "ferment"]) {
        "grain".to_string()
    } else if has(&["yeast"]) {
        "yeast".to_string()
    } else if has(&["misc", "additive", "other"]) {
        "misc".to_string()
    } else {
        lower
    }
}

/// One exported ingredient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrewingIngredient {
    pub name: String,
    pub price: f64,
    /// Stock unit name (the field name brewing imports expect).
    pub qu_id: String,
    pub product_group: String,
    pub product_id: u64,
}

/// Result payload of `list_brewing_ingredients`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrewingExport {
    pub count: usize,
    pub ingredients: Vec<BrewingIngredient>,
}

/// Filters for [`BrewingExport::build`].
#[derive(Debug, Clone, Default)]
pub struct BrewingFilter {
    /// Keep only products whose group name contains this (case-insensitive).
    pub product_group: Option<String>,
    /// Keep products without a price.
    pub include_unpriced: bool,
}

impl BrewingExport {
    /// Build the export in product catalog order.
    ///
    /// Price is the stock row's last purchase price, 0 when unknown.
    #[must_use]
    pub fn build(
        products: &[Product],
        units: &BTreeMap<u64, QuantityUnit>,
        groups: &BTreeMap<u64, ProductGroup>,
        stock: &StockLevels,
        filter: &BrewingFilter,
    ) -> Self {
        let group_filter = filter.product_group.as_deref().map(str::to_lowercase);

        let ingredients: Vec<BrewingIngredient> = products
            .iter()
            .filter_map(|product| {
                let group = product.product_group_id.and_then(|id| groups.get(&id));

                if let Some(wanted) = &group_filter {
                    let matches = group.is_some_and(|g| g.name.to_lowercase().contains(wanted));
                    if !matches {
                        return None;
                    }
                }

                let price = stock
                    .entry(product.id)
                    .and_then(|e| e.last_price)
                    .unwrap_or(0.0);
                if price == 0.0 && !filter.include_unpriced {
                    return None;
                }

                let unit = product
                    .qu_id_stock
                    .and_then(|id| units.get(&id))
                    .map_or_else(|| "unit".to_string(), |u| u.name.clone());

                Some(BrewingIngredient {
                    name: product.name.clone(),
                    price,
                    qu_id: unit,
                    product_group: category_hint(group.map(|g| g.name.as_str())),
                    product_id: product.id,
                })
            })
            .collect();

        Self {
            count: ingredients.len(),
            ingredients,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StockEntry;

    fn product(id: u64, name: &str, unit: u64, group: Option<u64>) -> Product {
        Product {
            id,
            name: name.to_string(),
            qu_id_stock: Some(unit),
            product_group_id: group,
        }
    }

    fn priced(product_id: u64, price: f64) -> StockEntry {
        StockEntry {
            product_id,
            amount: 1.0,
            amount_aggregated: 1.0,
            best_before_date: None,
            is_aggregated_amount: false,
            last_price: Some(price),
            product: None,
        }
    }

    fn fixtures() -> (
        Vec<Product>,
        BTreeMap<u64, QuantityUnit>,
        BTreeMap<u64, ProductGroup>,
        StockLevels,
    ) {
        let products = vec![
            product(1, "Cascade", 1, Some(10)),
            product(2, "Pale Malt", 2, Some(11)),
            product(3, "US-05", 1, Some(12)),
            product(4, "Milk", 3, None),
        ];
        let units = [(1, "g"), (2, "kg")]
            .into_iter()
            .map(|(id, name)| {
                (
                    id,
                    QuantityUnit {
                        id,
                        name: name.to_string(),
                    },
                )
            })
            .collect();
        let groups = [(10, "Hops"), (11, "Brewing Grains"), (12, "Yeast")]
            .into_iter()
            .map(|(id, name)| {
                (
                    id,
                    ProductGroup {
                        id,
                        name: name.to_string(),
                    },
                )
            })
            .collect();
        let stock = StockLevels::from_entries(vec![priced(1, 0.12), priced(2, 2.5)]);
        (products, units, groups, stock)
    }

    #[test]
    fn category_hints() {
        assert_eq!(category_hint(Some("Hops")), "hops");
        assert_eq!(category_hint(Some("Base Malts")), "grain");
        assert_eq!(category_hint(Some("Fermentables")), "grain");
        assert_eq!(category_hint(Some("Dry Yeast")), "yeast");
        assert_eq!(category_hint(Some("Additives")), "misc");
        assert_eq!(category_hint(Some("Dairy")), "dairy");
        assert_eq!(category_hint(None), "other");
    }

    #[test]
    fn skips_unpriced_products_by_default() {
        let (products, units, groups, stock) = fixtures();
        let export =
            BrewingExport::build(&products, &units, &groups, &stock, &BrewingFilter::default());

        assert_eq!(export.count, 2);
        assert_eq!(export.ingredients[0].name, "Cascade");
        assert_eq!(export.ingredients[0].product_group, "hops");
        assert_eq!(export.ingredients[0].qu_id, "g");
        assert_eq!(export.ingredients[1].product_group, "grain");
        assert_eq!(export.ingredients[1].price, 2.5);
    }

    #[test]
    fn include_all_keeps_unpriced_and_unknown_units() {
        let (products, units, groups, stock) = fixtures();
        let filter = BrewingFilter {
            product_group: None,
            include_unpriced: true,
        };
        let export = BrewingExport::build(&products, &units, &groups, &stock, &filter);

        assert_eq!(export.count, 4);
        let milk = &export.ingredients[3];
        assert_eq!(milk.qu_id, "unit");
        assert_eq!(milk.product_group, "other");
        assert_eq!(milk.price, 0.0);
    }

    #[test]
    fn group_filter_drops_ungrouped_products() {
        let (products, units, groups, stock) = fixtures();
        let filter = BrewingFilter {
            product_group: Some("YEAST".to_string()),
            include_unpriced: true,
        };
        let export = BrewingExport::build(&products, &units, &groups, &stock, &filter);

        assert_eq!(export.count, 1);
        assert_eq!(export.ingredients[0].name, "US-05");
    }
}
