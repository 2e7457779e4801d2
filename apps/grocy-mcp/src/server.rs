//! # Grocy MCP Server
//!
//! Implements `ServerHandler` with 44 MCP tools that proxy to the Grocy HTTP
//! API. Each tool method only forwards to its handler in [`crate::tools`];
//! argument decoding happens in the router, so a malformed call never reaches
//! a handler.

use crate::client::GrocyClient;
use crate::params::{
    AddProductParams, AddToShoppingListParams, BarcodeParams, BatteryIdParams, BrewingParams,
    BulkAddParams, BulkStockParams, ChargeBatteryParams, ChoreIdParams, ConsumeProductParams,
    CreateEntityParams, CreateRecipeParams, EntityObjectParams, ExecuteChoreParams,
    InventoryProductParams, MatchProductParams, OpenProductParams, ProductIdParams,
    RecipeIdParams, RecipeServingsParams, RemoveFromShoppingListParams, SearchProductsParams,
    TaskIdParams, TransferProductParams, UpdateEntityParams,
};
use crate::tools::{
    ToolResult, brewing, entities, household, recipes, shopping, stock, system,
};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

// =============================================================================
// MCP SERVER
// =============================================================================

/// MCP server that bridges to a Grocy HTTP API.
#[derive(Clone)]
pub struct GrocyMcp {
    client: GrocyClient,
    /// Shopping list that list-writing tools target.
    shopping_list_id: u64,
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

/// Turn a handler outcome into a tool result.
///
/// Handler failures become error-flagged results, never protocol errors.
fn finish(tool: &'static str, result: ToolResult) -> Result<CallToolResult, McpError> {
    match result {
        Ok(reply) => {
            tracing::debug!(tool, "Tool call succeeded");
            Ok(CallToolResult::success(vec![Content::text(reply.render())]))
        }
        Err(e) => {
            tracing::warn!(tool, status = ?e.status(), error = %e, "Tool call failed");
            Ok(CallToolResult::error(vec![Content::text(e.render())]))
        }
    }
}

// =============================================================================
// TOOL IMPLEMENTATIONS
// =============================================================================

#[tool_router]
impl GrocyMcp {
    pub fn new(client: GrocyClient, shopping_list_id: u64) -> Self {
        Self {
            client,
            shopping_list_id,
            tool_router: Self::tool_router(),
        }
    }

    // ---- Stock --------------------------------------------------------------

    #[tool(description = "Get current stock information for all products")]
    async fn get_stock(&self) -> Result<CallToolResult, McpError> {
        finish("get_stock", stock::get_stock(&self.client).await)
    }

    #[tool(description = "Get volatile stock information (products due soon, overdue, expired or missing)")]
    async fn get_volatile_stock(&self) -> Result<CallToolResult, McpError> {
        finish(
            "get_volatile_stock",
            stock::get_volatile_stock(&self.client).await,
        )
    }

    #[tool(description = "Get details for a specific product by ID")]
    async fn get_product_details(
        &self,
        params: Parameters<ProductIdParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "get_product_details",
            stock::get_product_details(&self.client, params.0).await,
        )
    }

    #[tool(description = "Add stock of a product (purchase)")]
    async fn add_product(
        &self,
        params: Parameters<AddProductParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "add_product",
            stock::add_product(&self.client, params.0).await,
        )
    }

    #[tool(description = "Consume/remove stock of a product")]
    async fn consume_product(
        &self,
        params: Parameters<ConsumeProductParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "consume_product",
            stock::consume_product(&self.client, params.0).await,
        )
    }

    #[tool(description = "Transfer product stock to a different location")]
    async fn transfer_product(
        &self,
        params: Parameters<TransferProductParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "transfer_product",
            stock::transfer_product(&self.client, params.0).await,
        )
    }

    #[tool(description = "Set absolute stock amount for a product (inventory/stocktaking)")]
    async fn inventory_product(
        &self,
        params: Parameters<InventoryProductParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "inventory_product",
            stock::inventory_product(&self.client, params.0).await,
        )
    }

    #[tool(description = "Mark a product as opened")]
    async fn open_product(
        &self,
        params: Parameters<OpenProductParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "open_product",
            stock::open_product(&self.client, params.0).await,
        )
    }

    #[tool(description = "Get product information by barcode")]
    async fn get_product_by_barcode(
        &self,
        params: Parameters<BarcodeParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "get_product_by_barcode",
            stock::get_product_by_barcode(&self.client, params.0).await,
        )
    }

    #[tool(description = "Get list of all products in Grocy")]
    async fn get_products(&self) -> Result<CallToolResult, McpError> {
        finish("get_products", stock::get_products(&self.client).await)
    }

    #[tool(description = "Search for products by name")]
    async fn search_products(
        &self,
        params: Parameters<SearchProductsParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "search_products",
            stock::search_products(&self.client, params.0).await,
        )
    }

    #[tool(description = "Get all stock entries for a specific product")]
    async fn get_product_entries(
        &self,
        params: Parameters<ProductIdParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "get_product_entries",
            stock::get_product_entries(&self.client, params.0).await,
        )
    }

    #[tool(description = "Get all storage locations")]
    async fn get_locations(&self) -> Result<CallToolResult, McpError> {
        finish("get_locations", stock::get_locations(&self.client).await)
    }

    // ---- Generic entities ---------------------------------------------------

    #[tool(description = "Create a new entity (product, location, recipe, chore, task, etc.)")]
    async fn create_entity(
        &self,
        params: Parameters<CreateEntityParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "create_entity",
            entities::create_entity(&self.client, params.0).await,
        )
    }

    #[tool(description = "Update an existing entity")]
    async fn update_entity(
        &self,
        params: Parameters<UpdateEntityParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "update_entity",
            entities::update_entity(&self.client, params.0).await,
        )
    }

    #[tool(description = "Delete an entity")]
    async fn delete_entity(
        &self,
        params: Parameters<EntityObjectParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "delete_entity",
            entities::delete_entity(&self.client, params.0).await,
        )
    }

    #[tool(description = "Get a specific entity by ID")]
    async fn get_entity(
        &self,
        params: Parameters<EntityObjectParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "get_entity",
            entities::get_entity(&self.client, params.0).await,
        )
    }

    // ---- Shopping list ------------------------------------------------------

    #[tool(description = "Get all items on shopping lists")]
    async fn get_shopping_list(&self) -> Result<CallToolResult, McpError> {
        finish(
            "get_shopping_list",
            shopping::get_shopping_list(&self.client).await,
        )
    }

    #[tool(description = "Add a product to the shopping list with the given quantity")]
    async fn add_to_shopping_list(
        &self,
        params: Parameters<AddToShoppingListParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "add_to_shopping_list",
            shopping::add_to_shopping_list(&self.client, self.shopping_list_id, params.0).await,
        )
    }

    #[tool(description = "Remove a product from the shopping list or reduce its quantity")]
    async fn remove_from_shopping_list(
        &self,
        params: Parameters<RemoveFromShoppingListParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "remove_from_shopping_list",
            shopping::remove_from_shopping_list(&self.client, params.0).await,
        )
    }

    #[tool(description = "Add all products below their minimum stock amount to the shopping list")]
    async fn add_missing_products_to_shopping_list(&self) -> Result<CallToolResult, McpError> {
        finish(
            "add_missing_products_to_shopping_list",
            shopping::add_missing_products_to_shopping_list(&self.client, self.shopping_list_id)
                .await,
        )
    }

    #[tool(description = "Add all expired products to the shopping list")]
    async fn add_expired_products_to_shopping_list(&self) -> Result<CallToolResult, McpError> {
        finish(
            "add_expired_products_to_shopping_list",
            shopping::add_expired_products_to_shopping_list(&self.client, self.shopping_list_id)
                .await,
        )
    }

    #[tool(description = "Clear the entire shopping list")]
    async fn clear_shopping_list(&self) -> Result<CallToolResult, McpError> {
        finish(
            "clear_shopping_list",
            shopping::clear_shopping_list(&self.client, self.shopping_list_id).await,
        )
    }

    // ---- Recipes ------------------------------------------------------------

    #[tool(description = "Get all recipes")]
    async fn get_recipes(&self) -> Result<CallToolResult, McpError> {
        finish("get_recipes", recipes::get_recipes(&self.client).await)
    }

    #[tool(description = "Check if recipe requirements are fulfilled by current stock")]
    async fn get_recipe_fulfillment(
        &self,
        params: Parameters<RecipeIdParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "get_recipe_fulfillment",
            recipes::get_recipe_fulfillment(&self.client, params.0).await,
        )
    }

    #[tool(description = "Consume products needed for a recipe")]
    async fn consume_recipe(
        &self,
        params: Parameters<RecipeIdParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "consume_recipe",
            recipes::consume_recipe(&self.client, params.0).await,
        )
    }

    #[tool(description = "Add missing products for a recipe to the shopping list")]
    async fn add_recipe_to_shopping_list(
        &self,
        params: Parameters<RecipeIdParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "add_recipe_to_shopping_list",
            recipes::add_recipe_to_shopping_list(&self.client, params.0).await,
        )
    }

    // ---- Chores, tasks, batteries -------------------------------------------

    #[tool(description = "Get all chores")]
    async fn get_chores(&self) -> Result<CallToolResult, McpError> {
        finish("get_chores", household::get_chores(&self.client).await)
    }

    #[tool(description = "Get details for a specific chore")]
    async fn get_chore_details(
        &self,
        params: Parameters<ChoreIdParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "get_chore_details",
            household::get_chore_details(&self.client, params.0).await,
        )
    }

    #[tool(description = "Mark a chore as completed")]
    async fn execute_chore(
        &self,
        params: Parameters<ExecuteChoreParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "execute_chore",
            household::execute_chore(&self.client, params.0).await,
        )
    }

    #[tool(description = "Get all tasks")]
    async fn get_tasks(&self) -> Result<CallToolResult, McpError> {
        finish("get_tasks", household::get_tasks(&self.client).await)
    }

    #[tool(description = "Mark a task as completed")]
    async fn complete_task(
        &self,
        params: Parameters<TaskIdParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "complete_task",
            household::complete_task(&self.client, params.0).await,
        )
    }

    #[tool(description = "Get all batteries and their charge status")]
    async fn get_batteries(&self) -> Result<CallToolResult, McpError> {
        finish("get_batteries", household::get_batteries(&self.client).await)
    }

    #[tool(description = "Get details for a specific battery")]
    async fn get_battery_details(
        &self,
        params: Parameters<BatteryIdParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "get_battery_details",
            household::get_battery_details(&self.client, params.0).await,
        )
    }

    #[tool(description = "Track battery charging")]
    async fn charge_battery(
        &self,
        params: Parameters<ChargeBatteryParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "charge_battery",
            household::charge_battery(&self.client, params.0).await,
        )
    }

    // ---- System -------------------------------------------------------------

    #[tool(description = "Get Grocy system information")]
    async fn get_system_info(&self) -> Result<CallToolResult, McpError> {
        finish("get_system_info", system::get_system_info(&self.client).await)
    }

    #[tool(description = "Get custom user fields for an entity")]
    async fn get_userfields(
        &self,
        params: Parameters<EntityObjectParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "get_userfields",
            system::get_userfields(&self.client, params.0).await,
        )
    }

    // ---- Composite ----------------------------------------------------------

    #[tool(
        description = "Create a complete recipe with all ingredients in a single operation. Supports automatic unit conversion when source_unit is given (e.g. from grams to kg)."
    )]
    async fn create_recipe_with_ingredients(
        &self,
        params: Parameters<CreateRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "create_recipe_with_ingredients",
            recipes::create_recipe_with_ingredients(&self.client, params.0).await,
        )
    }

    #[tool(description = "Check which ingredients are missing for a recipe and add them to the shopping list")]
    async fn add_recipe_missing_to_shopping_list(
        &self,
        params: Parameters<RecipeServingsParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "add_recipe_missing_to_shopping_list",
            recipes::add_recipe_missing_to_shopping_list(
                &self.client,
                self.shopping_list_id,
                params.0,
            )
            .await,
        )
    }

    #[tool(description = "Find products by name with fuzzy matching and confidence scores")]
    async fn match_product_by_name(
        &self,
        params: Parameters<MatchProductParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "match_product_by_name",
            stock::match_product_by_name(&self.client, params.0).await,
        )
    }

    #[tool(description = "Get stock levels for multiple products in a single call")]
    async fn bulk_get_stock(
        &self,
        params: Parameters<BulkStockParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "bulk_get_stock",
            stock::bulk_get_stock(&self.client, params.0).await,
        )
    }

    #[tool(description = "Get recipe details with current stock status for all ingredients")]
    async fn get_recipe_with_stock_status(
        &self,
        params: Parameters<RecipeServingsParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "get_recipe_with_stock_status",
            recipes::get_recipe_with_stock_status(&self.client, params.0).await,
        )
    }

    #[tool(description = "Add multiple products to the shopping list in one operation")]
    async fn bulk_add_to_shopping_list(
        &self,
        params: Parameters<BulkAddParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "bulk_add_to_shopping_list",
            shopping::bulk_add_to_shopping_list(&self.client, self.shopping_list_id, params.0)
                .await,
        )
    }

    #[tool(
        description = "Export brewing ingredients with pricing data for BeerSmith integration. Returns products with name, price, quantity unit and product group."
    )]
    async fn list_brewing_ingredients(
        &self,
        params: Parameters<BrewingParams>,
    ) -> Result<CallToolResult, McpError> {
        finish(
            "list_brewing_ingredients",
            brewing::list_brewing_ingredients(&self.client, params.0).await,
        )
    }
}

// =============================================================================
// SERVER HANDLER
// =============================================================================

#[tool_handler]
impl ServerHandler for GrocyMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Grocy household management server. Use tools to read and change stock, \
                 manage the shopping list, work with recipes, chores, tasks and batteries, \
                 and match product names to Grocy product IDs."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
