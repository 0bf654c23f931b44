//! Cart Domain Module
//!
//! This module contains the cart side of the storefront, including:
//! - Domain models (Product, CartItem, endpoint inputs/responses)
//! - The cart store (mutations and derived totals)
//! - REST API handlers

pub mod handlers;
pub mod models;
pub mod store;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use models::{CartItem, Product};
pub use store::{Cart, CartError};
