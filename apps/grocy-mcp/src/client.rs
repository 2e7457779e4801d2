//! # Grocy HTTP Client
//!
//! Wrapper around the Grocy REST API for use by the tool handlers.
//!
//! Every endpoint gets its own method with its path and payload spelled out.
//! There is no retry, no caching and no timeout beyond reqwest's defaults:
//! failures go straight back to the caller.

use crate::config::Config;
use grocy_core::{
    AddStock, AmountUpdate, ConsumeStock, CreatedObject, EntityName, InventoryStock, NewRecipe,
    NewRecipePosition, NewShoppingListItem, OpenStock, Product, ProductGroup, QuantityUnit,
    Recipe, RecipePosition, ShoppingListEntry, StockEntry, StockLevels, TrackedTime,
    TransferStock,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use thiserror::Error;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "GROCY-API-KEY";

/// Errors from the HTTP client layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Cannot reach the Grocy server.
    #[error("Cannot connect to Grocy at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    /// 401 Unauthorized - invalid or missing API key.
    #[error("Unauthorized: invalid or missing API key")]
    Unauthorized { body: Option<Value> },

    /// Any other non-2xx status.
    #[error("Request failed with status code {status}: {message}")]
    Api {
        status: u16,
        /// Grocy's `error_message`, or the status reason phrase.
        message: String,
        body: Option<Value>,
    },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A request URL could not be built.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Response body returned with the failure, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Unauthorized { body } | Self::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// HTTP status of the failure, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// HTTP client that wraps calls to the Grocy REST API.
#[derive(Clone)]
pub struct GrocyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GrocyClient {
    /// Create a new client for the Grocy API rooted at `base_url`
    /// (for example `http://grocy:80/api`).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.base_url.clone(), config.api_key.clone())
    }

    // =========================================================================
    // REQUEST PLUMBING
    // =========================================================================

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// Build a request with the API key header.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, path = url.path(), "Grocy request");
        self.http
            .request(method, url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Send a request and handle connection errors.
    async fn send(&self, req: RequestBuilder) -> Result<Response, ClientError> {
        req.send()
            .await
            .map_err(|e| ClientError::ConnectionFailed {
                url: self.base_url.clone(),
                reason: e.to_string(),
            })
    }

    /// Handle HTTP response: map error statuses and parse JSON.
    ///
    /// A 2xx with an empty body (204 No Content, most write endpoints)
    /// yields `Value::Null`.
    async fn handle_response(&self, resp: Response) -> Result<Value, ClientError> {
        let status = resp.status();
        let path = resp.url().path().to_string();
        let text = resp
            .text()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text)
                .map_err(|e| ClientError::Parse(format!("{path}: {e}")));
        }

        tracing::warn!(status = status.as_u16(), path = %path, "Grocy request failed");
        let body = error_body(&text);
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized { body });
        }

        let message = body
            .as_ref()
            .and_then(|b| b.get("error_message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            });
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
            body,
        })
    }

    async fn execute(&self, req: RequestBuilder) -> Result<Value, ClientError> {
        let resp = self.send(req).await?;
        self.handle_response(resp).await
    }

    async fn get(&self, path: &str) -> Result<Value, ClientError> {
        let req = self.request(Method::GET, self.url(path)?);
        self.execute(req).await
    }

    async fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let value = self.get(path).await?;
        serde_json::from_value(value).map_err(|e| ClientError::Parse(format!("{path}: {e}")))
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ClientError> {
        let req = self.request(Method::POST, self.url(path)?).json(body);
        self.execute(req).await
    }

    /// POST without a body, for action endpoints that take none.
    async fn post_empty(&self, path: &str) -> Result<Value, ClientError> {
        let req = self.request(Method::POST, self.url(path)?);
        self.execute(req).await
    }

    async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ClientError> {
        let req = self.request(Method::PUT, self.url(path)?).json(body);
        self.execute(req).await
    }

    async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        let req = self.request(Method::DELETE, self.url(path)?);
        self.execute(req).await
    }

    async fn create<B: Serialize>(&self, path: &str, body: &B) -> Result<CreatedObject, ClientError> {
        let value = self.post(path, body).await?;
        serde_json::from_value(value).map_err(|e| ClientError::Parse(format!("{path}: {e}")))
    }

    // =========================================================================
    // STOCK
    // =========================================================================

    /// GET /stock → stock overview rows.
    pub async fn stock(&self) -> Result<Value, ClientError> {
        self.get("/stock").await
    }

    /// GET /stock, indexed by product id.
    pub async fn stock_levels(&self) -> Result<StockLevels, ClientError> {
        let rows: Vec<StockEntry> = self.get_as("/stock").await?;
        Ok(StockLevels::from_entries(rows))
    }

    /// GET /stock/volatile → due soon, overdue, expired and missing products.
    pub async fn volatile_stock(&self) -> Result<Value, ClientError> {
        self.get("/stock/volatile").await
    }

    /// GET /stock/products/{id}
    pub async fn product_details(&self, product_id: u64) -> Result<Value, ClientError> {
        self.get(&format!("/stock/products/{product_id}")).await
    }

    /// GET /stock/products/{id}/entries
    pub async fn product_entries(&self, product_id: u64) -> Result<Value, ClientError> {
        self.get(&format!("/stock/products/{product_id}/entries"))
            .await
    }

    /// GET /stock/products/by-barcode/{barcode}
    ///
    /// The barcode is free text, so it is pushed as one escaped path segment.
    pub async fn product_by_barcode(&self, barcode: &str) -> Result<Value, ClientError> {
        let mut url = self.url("/stock/products/by-barcode")?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(barcode);
        let req = self.request(Method::GET, url);
        self.execute(req).await
    }

    /// POST /stock/products/{id}/add
    pub async fn add_stock(&self, product_id: u64, body: &AddStock) -> Result<Value, ClientError> {
        self.post(&format!("/stock/products/{product_id}/add"), body)
            .await
    }

    /// POST /stock/products/{id}/consume
    pub async fn consume_stock(
        &self,
        product_id: u64,
        body: &ConsumeStock,
    ) -> Result<Value, ClientError> {
        self.post(&format!("/stock/products/{product_id}/consume"), body)
            .await
    }

    /// POST /stock/products/{id}/transfer
    pub async fn transfer_stock(
        &self,
        product_id: u64,
        body: &TransferStock,
    ) -> Result<Value, ClientError> {
        self.post(&format!("/stock/products/{product_id}/transfer"), body)
            .await
    }

    /// POST /stock/products/{id}/inventory
    pub async fn inventory_stock(
        &self,
        product_id: u64,
        body: &InventoryStock,
    ) -> Result<Value, ClientError> {
        self.post(&format!("/stock/products/{product_id}/inventory"), body)
            .await
    }

    /// POST /stock/products/{id}/open
    pub async fn open_stock(&self, product_id: u64, body: &OpenStock) -> Result<Value, ClientError> {
        self.post(&format!("/stock/products/{product_id}/open"), body)
            .await
    }

    // =========================================================================
    // GENERIC OBJECTS
    // =========================================================================

    /// GET /objects/{entity}/{id}
    pub async fn object(&self, entity: &EntityName, object_id: u64) -> Result<Value, ClientError> {
        self.get(&format!("/objects/{entity}/{object_id}")).await
    }

    /// POST /objects/{entity} → `{"created_object_id": ...}`.
    pub async fn create_object(
        &self,
        entity: &EntityName,
        data: &Map<String, Value>,
    ) -> Result<Value, ClientError> {
        self.post(&format!("/objects/{entity}"), data).await
    }

    /// PUT /objects/{entity}/{id}
    pub async fn update_object(
        &self,
        entity: &EntityName,
        object_id: u64,
        data: &Map<String, Value>,
    ) -> Result<Value, ClientError> {
        self.put(&format!("/objects/{entity}/{object_id}"), data)
            .await
    }

    /// DELETE /objects/{entity}/{id}
    pub async fn delete_object(
        &self,
        entity: &EntityName,
        object_id: u64,
    ) -> Result<Value, ClientError> {
        self.delete(&format!("/objects/{entity}/{object_id}"))
            .await
    }

    // =========================================================================
    // CATALOG (typed)
    // =========================================================================

    /// GET /objects/products, raw.
    pub async fn products_raw(&self) -> Result<Value, ClientError> {
        self.get("/objects/products").await
    }

    /// GET /objects/products
    pub async fn products(&self) -> Result<Vec<Product>, ClientError> {
        self.get_as("/objects/products").await
    }

    /// GET /objects/quantity_units
    pub async fn quantity_units(&self) -> Result<Vec<QuantityUnit>, ClientError> {
        self.get_as("/objects/quantity_units").await
    }

    /// GET /objects/product_groups
    pub async fn product_groups(&self) -> Result<Vec<ProductGroup>, ClientError> {
        self.get_as("/objects/product_groups").await
    }

    /// GET /objects/locations
    pub async fn locations(&self) -> Result<Value, ClientError> {
        self.get("/objects/locations").await
    }

    // =========================================================================
    // SHOPPING LIST
    // =========================================================================

    /// GET /objects/shopping_list, raw.
    pub async fn shopping_list_raw(&self) -> Result<Value, ClientError> {
        self.get("/objects/shopping_list").await
    }

    /// GET /objects/shopping_list
    pub async fn shopping_list(&self) -> Result<Vec<ShoppingListEntry>, ClientError> {
        self.get_as("/objects/shopping_list").await
    }

    /// POST /objects/shopping_list
    pub async fn add_shopping_list_item(
        &self,
        item: &NewShoppingListItem,
    ) -> Result<CreatedObject, ClientError> {
        self.create("/objects/shopping_list", item).await
    }

    /// PUT /objects/shopping_list/{id} with a new amount.
    pub async fn set_shopping_list_amount(
        &self,
        entry_id: u64,
        amount: f64,
    ) -> Result<Value, ClientError> {
        self.put(
            &format!("/objects/shopping_list/{entry_id}"),
            &AmountUpdate { amount },
        )
        .await
    }

    /// DELETE /objects/shopping_list/{id}
    pub async fn delete_shopping_list_item(&self, entry_id: u64) -> Result<Value, ClientError> {
        self.delete(&format!("/objects/shopping_list/{entry_id}"))
            .await
    }

    /// POST /stock/shoppinglist/add-missing-products
    pub async fn add_missing_products(&self, list_id: u64) -> Result<Value, ClientError> {
        self.post(
            "/stock/shoppinglist/add-missing-products",
            &json!({ "list_id": list_id }),
        )
        .await
    }

    /// POST /stock/shoppinglist/add-expired-products
    pub async fn add_expired_products(&self, list_id: u64) -> Result<Value, ClientError> {
        self.post(
            "/stock/shoppinglist/add-expired-products",
            &json!({ "list_id": list_id }),
        )
        .await
    }

    /// POST /stock/shoppinglist/clear
    pub async fn clear_shopping_list(&self, list_id: u64) -> Result<Value, ClientError> {
        self.post("/stock/shoppinglist/clear", &json!({ "list_id": list_id }))
            .await
    }

    // =========================================================================
    // RECIPES
    // =========================================================================

    /// GET /objects/recipes
    pub async fn recipes(&self) -> Result<Value, ClientError> {
        self.get("/objects/recipes").await
    }

    /// GET /objects/recipes/{id}
    ///
    /// `None` when Grocy answers with an empty body or object instead of a
    /// recipe.
    pub async fn recipe(&self, recipe_id: u64) -> Result<Option<Recipe>, ClientError> {
        let path = format!("/objects/recipes/{recipe_id}");
        match self.get(&path).await? {
            Value::Null => Ok(None),
            Value::Object(map) if map.is_empty() => Ok(None),
            value => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| ClientError::Parse(format!("{path}: {e}"))),
        }
    }

    /// GET /objects/recipes_pos → ingredients of every recipe.
    pub async fn recipe_positions(&self) -> Result<Vec<RecipePosition>, ClientError> {
        self.get_as("/objects/recipes_pos").await
    }

    /// POST /objects/recipes
    pub async fn create_recipe(&self, recipe: &NewRecipe) -> Result<CreatedObject, ClientError> {
        self.create("/objects/recipes", recipe).await
    }

    /// POST /objects/recipes_pos
    pub async fn create_recipe_position(
        &self,
        position: &NewRecipePosition,
    ) -> Result<CreatedObject, ClientError> {
        self.create("/objects/recipes_pos", position).await
    }

    /// GET /recipes/{id}/fulfillment
    pub async fn recipe_fulfillment(&self, recipe_id: u64) -> Result<Value, ClientError> {
        self.get(&format!("/recipes/{recipe_id}/fulfillment")).await
    }

    /// POST /recipes/{id}/consume
    pub async fn consume_recipe(&self, recipe_id: u64) -> Result<Value, ClientError> {
        self.post_empty(&format!("/recipes/{recipe_id}/consume"))
            .await
    }

    /// POST /recipes/{id}/add-not-fulfilled-products-to-shoppinglist
    pub async fn add_recipe_to_shopping_list(&self, recipe_id: u64) -> Result<Value, ClientError> {
        self.post_empty(&format!(
            "/recipes/{recipe_id}/add-not-fulfilled-products-to-shoppinglist"
        ))
        .await
    }

    // =========================================================================
    // CHORES, TASKS, BATTERIES
    // =========================================================================

    /// GET /objects/chores
    pub async fn chores(&self) -> Result<Value, ClientError> {
        self.get("/objects/chores").await
    }

    /// GET /chores/{id}
    pub async fn chore(&self, chore_id: u64) -> Result<Value, ClientError> {
        self.get(&format!("/chores/{chore_id}")).await
    }

    /// POST /chores/{id}/execute
    pub async fn execute_chore(
        &self,
        chore_id: u64,
        body: &TrackedTime,
    ) -> Result<Value, ClientError> {
        self.post(&format!("/chores/{chore_id}/execute"), body)
            .await
    }

    /// GET /objects/tasks
    pub async fn tasks(&self) -> Result<Value, ClientError> {
        self.get("/objects/tasks").await
    }

    /// POST /tasks/{id}/complete
    pub async fn complete_task(&self, task_id: u64) -> Result<Value, ClientError> {
        self.post_empty(&format!("/tasks/{task_id}/complete")).await
    }

    /// GET /objects/batteries
    pub async fn batteries(&self) -> Result<Value, ClientError> {
        self.get("/objects/batteries").await
    }

    /// GET /batteries/{id}
    pub async fn battery(&self, battery_id: u64) -> Result<Value, ClientError> {
        self.get(&format!("/batteries/{battery_id}")).await
    }

    /// POST /batteries/{id}/charge
    pub async fn charge_battery(
        &self,
        battery_id: u64,
        body: &TrackedTime,
    ) -> Result<Value, ClientError> {
        self.post(&format!("/batteries/{battery_id}/charge"), body)
            .await
    }

    // =========================================================================
    // SYSTEM
    // =========================================================================

    /// GET /system/info
    pub async fn system_info(&self) -> Result<Value, ClientError> {
        self.get("/system/info").await
    }

    /// GET /userfields/{entity}/{id}
    pub async fn userfields(
        &self,
        entity: &EntityName,
        object_id: u64,
    ) -> Result<Value, ClientError> {
        self.get(&format!("/userfields/{entity}/{object_id}")).await
    }
}

/// Keep an error body as JSON, or as a string when it is not JSON.
fn error_body(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string())))
}

// =============================================================================
// TESTS
// =============================================================================
