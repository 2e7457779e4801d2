//! Chores, tasks and batteries.

use super::{ToolReply, ToolResult};
use crate::client::GrocyClient;
use crate::params::{
    BatteryIdParams, ChargeBatteryParams, ChoreIdParams, ExecuteChoreParams, TaskIdParams,
};
use grocy_core::TrackedTime;

fn tracked_time(raw: Option<String>) -> TrackedTime {
    TrackedTime {
        tracked_time: raw.filter(|t| !t.trim().is_empty()),
    }
}

// =============================================================================
// CHORES
// =============================================================================

pub async fn get_chores(client: &GrocyClient) -> ToolResult {
    Ok(ToolReply::Json(client.chores().await?))
}

pub async fn get_chore_details(client: &GrocyClient, p: ChoreIdParams) -> ToolResult {
    Ok(ToolReply::Json(client.chore(p.chore_id).await?))
}

pub async fn execute_chore(client: &GrocyClient, p: ExecuteChoreParams) -> ToolResult {
    client
        .execute_chore(p.chore_id, &tracked_time(p.tracked_time))
        .await?;
    Ok(ToolReply::message(format!(
        "Successfully executed chore {}",
        p.chore_id
    )))
}

// =============================================================================
// TASKS
// =============================================================================

pub async fn get_tasks(client: &GrocyClient) -> ToolResult {
    Ok(ToolReply::Json(client.tasks().await?))
}

pub async fn complete_task(client: &GrocyClient, p: TaskIdParams) -> ToolResult {
    client.complete_task(p.task_id).await?;
    Ok(ToolReply::message(format!(
        "Successfully completed task {}",
        p.task_id
    )))
}

// =============================================================================
// BATTERIES
// =============================================================================

pub async fn get_batteries(client: &GrocyClient) -> ToolResult {
    Ok(ToolReply::Json(client.batteries().await?))
}

pub async fn get_battery_details(client: &GrocyClient, p: BatteryIdParams) -> ToolResult {
    Ok(ToolReply::Json(client.battery(p.battery_id).await?))
}

pub async fn charge_battery(client: &GrocyClient, p: ChargeBatteryParams) -> ToolResult {
    client
        .charge_battery(p.battery_id, &tracked_time(p.tracked_time))
        .await?;
    Ok(ToolReply::message(format!(
        "Successfully charged battery {}",
        p.battery_id
    )))
}
