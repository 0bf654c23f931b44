//! Cart Domain Models
//!
//! This module contains all data structures related to the shopping cart
//! business domain, plus the request/response shapes of the cart endpoints.

use crate::checkout::models::OrderSummary;
use serde::{Deserialize, Serialize};

/// Returns the default quantity (1) for cart operations
fn default_quantity() -> u32 {
    1
}

/// A catalog product. Supplied by the storefront and read-only to the cart;
/// `stock` is the maximum quantity a cart may hold of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit price, non-negative
    pub price: f64,

    /// Pre-discount price, shown struck through when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,

    /// Units available
    pub stock: u32,

    /// Category label used by catalog filters
    pub category: String,

    /// Average review rating
    pub rating: f64,

    /// Review count
    pub reviews: u32,

    /// Image reference
    pub image: String,

    /// Optional promotional badge (e.g. "Sale", "New")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,

    /// Short product description
    pub description: String,
}

/// One distinct product in the cart together with its quantity.
///
/// Invariant: `quantity >= 1` whenever the item is present; the cart store
/// removes items instead of keeping them at zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// The product this entry refers to
    pub product: Product,

    /// Quantity of this item (defaults to 1)
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Input for `POST /cart/add`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartInput {
    /// Product to add
    pub product: Product,

    /// Quantity to add (defaults to 1)
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Optional session identifier
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Input for `POST /cart/remove`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartInput {
    /// Id of the product to remove
    pub product_id: String,

    /// Optional session identifier
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Input for `POST /cart/update_quantity`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityInput {
    /// Id of the product to update
    pub product_id: String,

    /// New quantity; zero or negative removes the item
    pub quantity: i64,

    /// Optional session identifier
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Input for `POST /cart/clear`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearCartInput {
    /// Optional session identifier
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response body for all cart endpoints: the cart contents plus every
/// derived figure the storefront renders (badge count, totals, summary).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    /// Cart items in insertion order
    pub items: Vec<CartItem>,

    /// Sum of quantities across all items
    pub total_items: u32,

    /// Sum of `price * quantity` across all items
    pub total_price: f64,

    /// Derived pricing breakdown
    pub summary: OrderSummary,
}
