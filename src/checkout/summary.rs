//! Order Summary Calculator
//!
//! Derives the pricing breakdown shown next to the checkout forms from the
//! current cart contents. Stateless: recomputed on every call so it always
//! reflects the latest cart, with no cache to invalidate.

use super::models::OrderSummary;
use crate::cart::store::Cart;

/// Orders above this subtotal ship for free. Exclusive bound: a subtotal of
/// exactly 100 still pays the fee.
pub const FREE_SHIPPING_THRESHOLD: f64 = 100.0;

/// Flat shipping fee below the free-shipping threshold.
pub const SHIPPING_FEE: f64 = 15.0;

/// Flat tax rate applied to the subtotal.
pub const TAX_RATE: f64 = 0.08;

/// Computes subtotal, shipping, tax and total for the given cart.
pub fn compute_summary(cart: &Cart) -> OrderSummary {
    let subtotal = cart.total_price();
    let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
        0.0
    } else {
        SHIPPING_FEE
    };
    let tax = subtotal * TAX_RATE;

    OrderSummary {
        subtotal,
        shipping,
        tax,
        total: subtotal + shipping + tax,
    }
}
