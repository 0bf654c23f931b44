//! Storefront Cart & Checkout Library
//!
//! This library provides the core functionality for a storefront shopping
//! cart and its multi-step checkout flow:
//! - Cart store (items, quantities, derived totals)
//! - Checkout wizard state machine (shipping → payment → review → confirmation)
//! - Form validation rules gating step transitions
//! - Order summary calculation (subtotal, shipping, tax, total)

// Domain modules
pub mod cart;
pub mod checkout;

// Infrastructure
pub mod config;
pub mod router;
pub mod session;
