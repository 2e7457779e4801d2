//! Ingredient export for brewing software.

use super::{ToolReply, ToolResult};
use crate::client::GrocyClient;
use crate::params::BrewingParams;
use grocy_core::{BrewingExport, BrewingFilter};
use std::collections::BTreeMap;

pub async fn list_brewing_ingredients(client: &GrocyClient, p: BrewingParams) -> ToolResult {
    let products = client.products().await?;
    let units: BTreeMap<_, _> = client
        .quantity_units()
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let groups: BTreeMap<_, _> = client
        .product_groups()
        .await?
        .into_iter()
        .map(|g| (g.id, g))
        .collect();
    let stock = client.stock_levels().await?;

    let filter = BrewingFilter {
        product_group: p.product_group_filter.filter(|f| !f.trim().is_empty()),
        include_unpriced: p.include_all_products.unwrap_or(false),
    };
    ToolReply::json(&BrewingExport::build(
        &products, &units, &groups, &stock, &filter,
    ))
}
