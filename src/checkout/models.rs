//! Checkout Domain Models
//!
//! Data accumulated by the checkout wizard (shipping and payment details),
//! the step and error types of the state machine, and the derived order
//! summary.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Delivery details collected on the first checkout step.
///
/// All fields are required for a valid checkout; empty strings denote
/// not-yet-entered values and are rejected by validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Billing address, only supplied when it differs from the shipping address.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BillingAddress {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Card details collected on the payment step.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentInfo {
    pub cardholder_name: String,

    /// 13-19 digits, spaces allowed as separators
    pub card_number: String,

    /// MM/YY
    pub expiry_date: String,

    /// 3-4 digits
    pub cvv: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<BillingAddress>,
}

impl PaymentInfo {
    /// Last four digits of the card number, for display without exposing
    /// the full number.
    pub fn card_last4(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().filter(|c| c.is_ascii_digit()).collect();
        digits.iter().rev().take(4).rev().collect()
    }
}

/// One field-scoped validation failure. A field is reported at most once
/// per validation pass; an empty error list means the form is valid.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    /// Field name as the form knows it (e.g. "email", "cardNumber")
    pub field: &'static str,

    /// Human-readable message rendered inline next to the field
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// The four steps of the checkout wizard, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    #[default]
    Shipping,
    Payment,
    Review,
    Confirmation,
}

impl CheckoutStep {
    /// Zero-based position in the wizard (0-3).
    pub fn index(self) -> u8 {
        match self {
            CheckoutStep::Shipping => 0,
            CheckoutStep::Payment => 1,
            CheckoutStep::Review => 2,
            CheckoutStep::Confirmation => 3,
        }
    }

    /// Step label shown in the progress indicator.
    pub fn title(self) -> &'static str {
        match self {
            CheckoutStep::Shipping => "Shipping",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Review => "Review",
            CheckoutStep::Confirmation => "Complete",
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Errors returned by wizard operations. Validation failures carry the
/// field-scoped errors so the form can re-render with inline messages;
/// nothing in the wizard ever panics or discards previously entered data.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// Checkout requires a non-empty cart (confirmation excepted).
    #[error("cart is empty")]
    EmptyCart,

    /// The submitted form failed validation; the step does not advance.
    #[error("validation failed for {} field(s)", .0.len())]
    Invalid(Vec<FieldError>),

    /// A submission for this wizard is already in flight.
    #[error("a submission is already in progress")]
    SubmissionInProgress,

    /// The requested operation is not allowed from the current step.
    #[error("cannot {action} from the {from} step")]
    InvalidTransition {
        from: CheckoutStep,
        action: &'static str,
    },
}

/// Derived pricing breakdown for the current cart. Never stored; recomputed
/// from cart contents on every read.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct OrderSummary {
    pub subtotal: f64,
    pub shipping: f64,
    pub tax: f64,
    pub total: f64,
}
