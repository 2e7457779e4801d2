//! System information and user fields.

use super::{ToolReply, ToolResult};
use crate::client::GrocyClient;
use crate::params::EntityObjectParams;
use grocy_core::EntityName;

pub async fn get_system_info(client: &GrocyClient) -> ToolResult {
    Ok(ToolReply::Json(client.system_info().await?))
}

pub async fn get_userfields(client: &GrocyClient, p: EntityObjectParams) -> ToolResult {
    let entity = EntityName::parse(&p.entity)?;
    Ok(ToolReply::Json(client.userfields(&entity, p.object_id).await?))
}
