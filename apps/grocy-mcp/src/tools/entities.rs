//! Generic CRUD over `/objects/{entity}`.
//!
//! The entity name is validated before it is spliced into a path.

use super::{ToolReply, ToolResult};
use crate::client::GrocyClient;
use crate::params::{CreateEntityParams, EntityObjectParams, UpdateEntityParams};
use grocy_core::EntityName;
use serde_json::Value;

pub async fn create_entity(client: &GrocyClient, p: CreateEntityParams) -> ToolResult {
    let entity = EntityName::parse(&p.entity)?;
    let created = client.create_object(&entity, &p.data).await?;

    let id = match created.get("created_object_id") {
        Some(Value::String(id)) => id.clone(),
        Some(id) => id.to_string(),
        None => "unknown".to_string(),
    };
    let pretty = serde_json::to_string_pretty(&created)?;
    Ok(ToolReply::message(format!(
        "Successfully created {entity} with ID: {id}\n{pretty}"
    )))
}

pub async fn update_entity(client: &GrocyClient, p: UpdateEntityParams) -> ToolResult {
    let entity = EntityName::parse(&p.entity)?;
    client.update_object(&entity, p.object_id, &p.data).await?;
    Ok(ToolReply::message(format!(
        "Successfully updated {entity} {}",
        p.object_id
    )))
}

pub async fn delete_entity(client: &GrocyClient, p: EntityObjectParams) -> ToolResult {
    let entity = EntityName::parse(&p.entity)?;
    client.delete_object(&entity, p.object_id).await?;
    Ok(ToolReply::message(format!(
        "Successfully deleted {entity} {}",
        p.object_id
    )))
}

pub async fn get_entity(client: &GrocyClient, p: EntityObjectParams) -> ToolResult {
    let entity = EntityName::parse(&p.entity)?;
    Ok(ToolReply::Json(client.object(&entity, p.object_id).await?))
}
