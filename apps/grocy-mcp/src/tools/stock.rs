//! Stock levels, stock actions and product lookup.

use super::{ToolReply, ToolResult};
use crate::client::{ClientError, GrocyClient};
use crate::params::{
    AddProductParams, BarcodeParams, BulkStockParams, ConsumeProductParams,
    InventoryProductParams, MatchProductParams, OpenProductParams, ProductIdParams,
    SearchProductsParams, TransferProductParams,
};
use grocy_core::matching::{DEFAULT_MATCH_LIMIT, filter_by_name};
use grocy_core::types::{NEVER_EXPIRES, non_negative, positive, positive_or};
use grocy_core::{
    AddStock, ConsumeStock, GrocyError, InventoryStock, OpenStock, StockLevels, TransferStock,
    rank_products,
};
use serde::Serialize;
use serde_json::Value;

// =============================================================================
// READS
// =============================================================================

pub async fn get_stock(client: &GrocyClient) -> ToolResult {
    Ok(ToolReply::Json(client.stock().await?))
}

pub async fn get_volatile_stock(client: &GrocyClient) -> ToolResult {
    Ok(ToolReply::Json(client.volatile_stock().await?))
}

pub async fn get_product_details(client: &GrocyClient, p: ProductIdParams) -> ToolResult {
    Ok(ToolReply::Json(client.product_details(p.product_id).await?))
}

pub async fn get_product_entries(client: &GrocyClient, p: ProductIdParams) -> ToolResult {
    Ok(ToolReply::Json(client.product_entries(p.product_id).await?))
}

pub async fn get_product_by_barcode(client: &GrocyClient, p: BarcodeParams) -> ToolResult {
    let barcode = p.barcode.trim();
    if barcode.is_empty() {
        return Err(GrocyError::InvalidArgument("barcode must not be empty".to_string()).into());
    }
    Ok(ToolReply::Json(client.product_by_barcode(barcode).await?))
}

pub async fn get_products(client: &GrocyClient) -> ToolResult {
    Ok(ToolReply::Json(client.products_raw().await?))
}

pub async fn get_locations(client: &GrocyClient) -> ToolResult {
    Ok(ToolReply::Json(client.locations().await?))
}

/// Full product objects whose name contains the query.
pub async fn search_products(client: &GrocyClient, p: SearchProductsParams) -> ToolResult {
    let products = match client.products_raw().await? {
        Value::Array(items) => items,
        other => {
            return Err(ClientError::Parse(format!(
                "/objects/products: expected an array, got {other}"
            ))
            .into());
        }
    };
    Ok(ToolReply::Json(Value::Array(filter_by_name(
        products, &p.query,
    ))))
}

pub async fn match_product_by_name(client: &GrocyClient, p: MatchProductParams) -> ToolResult {
    let products = client.products().await?;
    let report = rank_products(
        &p.name,
        &products,
        p.fuzzy.unwrap_or(true),
        p.limit.unwrap_or(DEFAULT_MATCH_LIMIT),
    )?;
    ToolReply::json(&report)
}

// =============================================================================
// BULK STOCK LOOKUP
// =============================================================================

/// Stock of one requested product.
#[derive(Debug, Serialize)]
struct StockLookup {
    product_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_name: Option<String>,
    amount: f64,
    amount_aggregated: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    best_before_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_aggregated_amount: Option<bool>,
    in_stock: bool,
}

#[derive(Debug, Serialize)]
struct BulkStockReport {
    products_checked: usize,
    results: Vec<StockLookup>,
}

fn lookup(levels: &StockLevels, product_id: u64) -> StockLookup {
    match levels.entry(product_id) {
        Some(entry) => StockLookup {
            product_id,
            product_name: Some(
                entry
                    .product
                    .as_ref()
                    .map_or_else(|| "Unknown".to_string(), |p| p.name.clone()),
            ),
            amount: entry.amount,
            amount_aggregated: entry.amount_aggregated,
            best_before_date: entry.best_before_date.clone(),
            is_aggregated_amount: Some(entry.is_aggregated_amount),
            in_stock: true,
        },
        None => StockLookup {
            product_id,
            product_name: None,
            amount: 0.0,
            amount_aggregated: 0.0,
            best_before_date: None,
            is_aggregated_amount: None,
            in_stock: false,
        },
    }
}

/// One `GET /stock`, projected onto the requested ids in request order.
pub async fn bulk_get_stock(client: &GrocyClient, p: BulkStockParams) -> ToolResult {
    let levels = client.stock_levels().await?;
    let results: Vec<StockLookup> = p
        .product_ids
        .iter()
        .map(|id| lookup(&levels, *id))
        .collect();
    ToolReply::json(&BulkStockReport {
        products_checked: p.product_ids.len(),
        results,
    })
}

// =============================================================================
// STOCK ACTIONS
// =============================================================================

pub async fn add_product(client: &GrocyClient, p: AddProductParams) -> ToolResult {
    let amount = positive(p.amount, "amount")?;
    let body = AddStock {
        amount,
        best_before_date: p
            .best_before_date
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| NEVER_EXPIRES.to_string()),
        price: p.price,
    };
    client.add_stock(p.product_id, &body).await?;
    Ok(ToolReply::message(format!(
        "Successfully added {amount} units of product {}",
        p.product_id
    )))
}

pub async fn consume_product(client: &GrocyClient, p: ConsumeProductParams) -> ToolResult {
    let amount = positive(p.amount, "amount")?;
    let body = ConsumeStock {
        amount,
        spoiled: p.spoiled,
    };
    client.consume_stock(p.product_id, &body).await?;
    Ok(ToolReply::message(format!(
        "Successfully consumed {amount} units of product {}",
        p.product_id
    )))
}

pub async fn transfer_product(client: &GrocyClient, p: TransferProductParams) -> ToolResult {
    let amount = positive(p.amount, "amount")?;
    let body = TransferStock {
        amount,
        location_id_from: p.location_id_from,
        location_id_to: p.location_id_to,
    };
    client.transfer_stock(p.product_id, &body).await?;
    Ok(ToolReply::message(format!(
        "Successfully transferred {amount} units of product {}",
        p.product_id
    )))
}

pub async fn inventory_product(client: &GrocyClient, p: InventoryProductParams) -> ToolResult {
    let new_amount = non_negative(p.new_amount, "new_amount")?;
    let body = InventoryStock {
        new_amount,
        best_before_date: p.best_before_date.filter(|d| !d.trim().is_empty()),
    };
    client.inventory_stock(p.product_id, &body).await?;
    Ok(ToolReply::message(format!(
        "Successfully set stock of product {} to {new_amount}",
        p.product_id
    )))
}

pub async fn open_product(client: &GrocyClient, p: OpenProductParams) -> ToolResult {
    let amount = positive_or(p.amount, 1.0, "amount")?;
    client
        .open_stock(p.product_id, &OpenStock { amount })
        .await?;
    Ok(ToolReply::message(format!(
        "Successfully opened {amount} unit(s) of product {}",
        p.product_id
    )))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use grocy_core::StockEntry;

    #[test]
    fn lookup_marks_missing_products() {
        let rows: Vec<StockEntry> = serde_json::from_value(serde_json::json!([
            {"product_id": 1, "amount": 2, "amount_aggregated": 3,
             "best_before_date": "2030-01-01", "is_aggregated_amount": 1,
             "product": {"id": 1, "name": "Milk"}}
        ]))
        .expect("rows");
        let levels = StockLevels::from_entries(rows);

        let found = serde_json::to_value(lookup(&levels, 1)).expect("json");
        assert_eq!(found["product_name"], "Milk");
        assert_eq!(found["amount_aggregated"], 3.0);
        assert_eq!(found["is_aggregated_amount"], true);
        assert_eq!(found["in_stock"], true);

        let missing = serde_json::to_value(lookup(&levels, 9)).expect("json");
        assert_eq!(missing["amount"], 0.0);
        assert_eq!(missing["in_stock"], false);
        assert!(missing.get("product_name").is_none());
    }
}
