//! Shopping list reads, writes and bulk add.
//!
//! Items are written through `POST /objects/shopping_list` onto the
//! configured list; removals look across every list.

use super::{ToolReply, ToolResult};
use crate::client::GrocyClient;
use crate::params::{AddToShoppingListParams, BulkAddParams, RemoveFromShoppingListParams};
use grocy_core::shopping::find_entry;
use grocy_core::types::{positive, positive_or};
use grocy_core::{BulkAddDetail, BulkAddReport, NewShoppingListItem, RemovalPlan, plan_removal};

fn note(raw: Option<String>) -> Option<String> {
    raw.filter(|n| !n.trim().is_empty())
}

pub async fn get_shopping_list(client: &GrocyClient) -> ToolResult {
    Ok(ToolReply::Json(client.shopping_list_raw().await?))
}

pub async fn add_to_shopping_list(
    client: &GrocyClient,
    list_id: u64,
    p: AddToShoppingListParams,
) -> ToolResult {
    let amount = positive_or(p.amount, 1.0, "amount")?;
    let item = NewShoppingListItem {
        product_id: p.product_id,
        shopping_list_id: list_id,
        amount,
        note: note(p.note),
    };
    let created = client.add_shopping_list_item(&item).await?;
    Ok(ToolReply::message(format!(
        "Successfully added {amount} unit(s) of product {} to shopping list (entry ID: {})",
        p.product_id, created.created_object_id
    )))
}

/// Reduce or delete the product's first shopping list entry.
pub async fn remove_from_shopping_list(
    client: &GrocyClient,
    p: RemoveFromShoppingListParams,
) -> ToolResult {
    let entries = client.shopping_list().await?;
    let Some(entry) = find_entry(&entries, p.product_id) else {
        return Ok(ToolReply::message(format!(
            "Product {} not found on shopping list",
            p.product_id
        )));
    };

    match plan_removal(entry, p.amount)? {
        RemovalPlan::Delete { entry_id } => {
            client.delete_shopping_list_item(entry_id).await?;
            Ok(ToolReply::message(format!(
                "Successfully removed product {} from shopping list",
                p.product_id
            )))
        }
        RemovalPlan::Reduce {
            entry_id,
            new_amount,
        } => {
            client.set_shopping_list_amount(entry_id, new_amount).await?;
            Ok(ToolReply::message(format!(
                "Successfully reduced product {} to {new_amount} unit(s) on shopping list",
                p.product_id
            )))
        }
    }
}

pub async fn add_missing_products_to_shopping_list(
    client: &GrocyClient,
    list_id: u64,
) -> ToolResult {
    client.add_missing_products(list_id).await?;
    Ok(ToolReply::message(
        "Successfully added missing products to shopping list",
    ))
}

pub async fn add_expired_products_to_shopping_list(
    client: &GrocyClient,
    list_id: u64,
) -> ToolResult {
    client.add_expired_products(list_id).await?;
    Ok(ToolReply::message(
        "Successfully added expired products to shopping list",
    ))
}

pub async fn clear_shopping_list(client: &GrocyClient, list_id: u64) -> ToolResult {
    client.clear_shopping_list(list_id).await?;
    Ok(ToolReply::message("Successfully cleared shopping list"))
}

/// Add each item on its own; one failure does not stop the rest.
pub async fn bulk_add_to_shopping_list(
    client: &GrocyClient,
    list_id: u64,
    p: BulkAddParams,
) -> ToolResult {
    let mut details = Vec::with_capacity(p.items.len());

    for item in p.items {
        let amount = match positive(item.amount, "amount") {
            Ok(amount) => amount,
            Err(e) => {
                details.push(BulkAddDetail::failed(item.product_id, item.amount, e.to_string()));
                continue;
            }
        };
        let new_item = NewShoppingListItem {
            product_id: item.product_id,
            shopping_list_id: list_id,
            amount,
            note: note(item.note),
        };
        let detail = match client.add_shopping_list_item(&new_item).await {
            Ok(created) => {
                BulkAddDetail::added(item.product_id, amount, created.created_object_id)
            }
            Err(e) => BulkAddDetail::failed(item.product_id, amount, e.to_string()),
        };
        details.push(detail);
    }

    ToolReply::json(&BulkAddReport::from_details(details))
}
