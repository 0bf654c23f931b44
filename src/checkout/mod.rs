//! Checkout Domain Module
//!
//! This module contains the checkout flow, including:
//! - Domain models (shipping/payment details, steps, errors, order summary)
//! - The wizard state machine sequencing the steps
//! - Form validation rules gating step transitions
//! - The order summary calculator
//! - REST API handlers

pub mod handlers;
pub mod models;
pub mod summary;
pub mod validation;
pub mod wizard;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use models::{CheckoutError, CheckoutStep, FieldError, OrderSummary, PaymentInfo, ShippingInfo};
pub use summary::compute_summary;
pub use wizard::CheckoutState;
