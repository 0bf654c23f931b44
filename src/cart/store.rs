//! Cart Store
//!
//! Owns the list of (product, quantity) entries for one shopping session and
//! exposes the mutation operations and derived totals. The cart is an
//! explicit value handed to whoever needs it; there is no ambient singleton.

use super::models::{CartItem, Product};
use thiserror::Error;

/// Errors returned by cart mutations. These are ordinary return values, not
/// panics; the cart is unchanged when a mutation fails.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The requested quantity would exceed the product's available stock.
    #[error("requested quantity {requested} of product {product_id} exceeds stock {available}")]
    StockExceeded {
        product_id: String,
        requested: u32,
        available: u32,
    },
}

/// An ordered collection of cart items, at most one per product id.
///
/// Insertion order is preserved for display. Items are only reachable
/// through the methods here, which maintain the `quantity >= 1` and
/// uniqueness invariants.
#[derive(Debug, Default, Clone)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cart items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds `quantity` units of `product` to the cart.
    ///
    /// If the product is already in the cart its quantity is increased,
    /// otherwise a new item is appended. Adding zero units is a no-op.
    /// Fails with [`CartError::StockExceeded`] when the resulting quantity
    /// would exceed `product.stock`, leaving the cart unchanged.
    pub fn add(&mut self, product: Product, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Ok(());
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            let requested = existing.quantity.saturating_add(quantity);
            if requested > existing.product.stock {
                return Err(CartError::StockExceeded {
                    product_id: product.id,
                    requested,
                    available: existing.product.stock,
                });
            }
            existing.quantity = requested;
        } else {
            if quantity > product.stock {
                return Err(CartError::StockExceeded {
                    product_id: product.id,
                    requested: quantity,
                    available: product.stock,
                });
            }
            self.items.push(CartItem { product, quantity });
        }

        Ok(())
    }

    /// Removes the item for `product_id`. Unknown ids are a no-op.
    pub fn remove(&mut self, product_id: &str) {
        self.items.retain(|i| i.product.id != product_id);
    }

    /// Sets the quantity for `product_id` to exactly `quantity`.
    ///
    /// A quantity of zero or less removes the item. Unknown ids are a
    /// no-op. Fails with [`CartError::StockExceeded`] when `quantity`
    /// exceeds the product's stock.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            self.remove(product_id);
            return Ok(());
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            if quantity > item.product.stock {
                return Err(CartError::StockExceeded {
                    product_id: product_id.to_string(),
                    requested: quantity,
                    available: item.product.stock,
                });
            }
            item.quantity = quantity;
        }

        Ok(())
    }

    /// Empties the cart unconditionally.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities across all items.
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of `price * quantity` across all items.
    pub fn total_price(&self) -> f64 {
        self.items
            .iter()
            .map(|i| i.product.price * f64::from(i.quantity))
            .sum()
    }
}
