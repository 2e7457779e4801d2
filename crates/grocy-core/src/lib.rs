//! # grocy-core
//!
//! Domain logic for the Grocy MCP bridge - THE LOGIC.
//!
//! Grocy owns every record; this crate only describes the subset of each
//! record the bridge reads, and implements the calculations that run on the
//! client side of the API:
//!
//! - `types` → Grocy records, request payloads and `GrocyError`
//! - `lenient` → numeric decoding that accepts numbers or numeric strings
//! - `matching` → product name scoring for `match_product_by_name`
//! - `units` → mass unit conversion for recipe ingredients
//! - `shortfall` → needed/missing amounts for a recipe at N servings
//! - `shopping` → planning removals from the shopping list
//! - `batch` → per-item outcome reports for bulk operations
//! - `brewing` → ingredient export for brewing software
//!
//! ## Architectural Constraints
//!
//! - Has NO async, NO network dependencies (pure Rust)
//! - Every function receives data the caller already fetched
//! - Ordered collections only (`BTreeMap`), so output order never depends on hashing

// =============================================================================
// MODULES
// =============================================================================

pub mod batch;
pub mod brewing;
pub mod lenient;
pub mod matching;
pub mod shopping;
pub mod shortfall;
pub mod types;
pub mod units;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    CreatedObject, EntityName, GrocyError, Product, ProductGroup, QuantityUnit, Recipe,
    RecipePosition, ShoppingListEntry, StockEntry, StockLevels,
};

// Request payloads
pub use types::{
    AddStock, AmountUpdate, ConsumeStock, InventoryStock, NewRecipe, NewRecipePosition,
    NewShoppingListItem, OpenStock, TrackedTime, TransferStock,
};

// =============================================================================
// RE-EXPORTS: Calculations
// =============================================================================

pub use batch::{
    BulkAddDetail, BulkAddReport, IngredientDetail, ItemStatus, RecipeCreationReport,
    ShortfallDetail, ShortfallReport,
};
pub use brewing::{BrewingExport, BrewingFilter, BrewingIngredient, category_hint};
pub use matching::{MatchKind, MatchReport, MatchScore, ProductMatch, rank_products, score_name};
pub use shopping::{RemovalPlan, plan_removal};
pub use shortfall::{IngredientStatus, RecipeStockStatus, Shortfall};
pub use units::{Conversion, MassUnit, convert};
