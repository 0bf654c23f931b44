//! Checkout Wizard State Machine
//!
//! Sequences the checkout steps (shipping → payment → review → confirmation),
//! accumulating the data each step collects and gating forward transitions on
//! validation. The wizard never touches the cart; clearing it on confirmation
//! is the caller's side effect.

use super::models::{CheckoutError, CheckoutStep, PaymentInfo, ShippingInfo};
use super::validation::{validate_payment_info, validate_shipping_info};
use uuid::Uuid;

/// State of one checkout session.
///
/// Created fresh when checkout begins. The step only advances forward on a
/// successful submission of the current step's form; `back` moves one step
/// backward without erasing entered data; `restart` resets everything.
#[derive(Debug, Default)]
pub struct CheckoutState {
    step: CheckoutStep,
    shipping_info: Option<ShippingInfo>,
    payment_info: Option<PaymentInfo>,
    order_number: String,
    submitting: bool,
}

impl CheckoutState {
    /// A fresh wizard at the shipping step with no accumulated data.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Shipping details, present once the shipping step has completed.
    pub fn shipping_info(&self) -> Option<&ShippingInfo> {
        self.shipping_info.as_ref()
    }

    /// Payment details, present once the payment step has completed.
    pub fn payment_info(&self) -> Option<&PaymentInfo> {
        self.payment_info.as_ref()
    }

    /// The order number, empty until the order is confirmed.
    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Marks a submission as in flight. Fails if one already is, so a second
    /// submit of the same form during the processing window is rejected.
    pub fn begin_submit(&mut self) -> Result<(), CheckoutError> {
        if self.submitting {
            return Err(CheckoutError::SubmissionInProgress);
        }
        self.submitting = true;
        Ok(())
    }

    /// Clears the in-flight flag once the submission has resolved.
    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    /// Shipping → Payment, gated by shipping-form validation.
    ///
    /// On validation failure the wizard stays at the shipping step, keeps
    /// any previously stored data, and returns the field errors.
    pub fn submit_shipping(&mut self, info: ShippingInfo) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::Shipping {
            return Err(CheckoutError::InvalidTransition {
                from: self.step,
                action: "submit shipping details",
            });
        }

        let errors = validate_shipping_info(&info);
        if !errors.is_empty() {
            return Err(CheckoutError::Invalid(errors));
        }

        self.shipping_info = Some(info);
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Payment → Review, gated by payment-form validation.
    pub fn submit_payment(&mut self, info: PaymentInfo) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::InvalidTransition {
                from: self.step,
                action: "submit payment details",
            });
        }

        let errors = validate_payment_info(&info);
        if !errors.is_empty() {
            return Err(CheckoutError::Invalid(errors));
        }

        self.payment_info = Some(info);
        self.step = CheckoutStep::Review;
        Ok(())
    }

    /// Review → Confirmation. No further validation; generates and returns
    /// the order number. A random token rather than a timestamp, so rapid
    /// repeated orders cannot collide.
    pub fn place_order(&mut self) -> Result<String, CheckoutError> {
        if self.step != CheckoutStep::Review {
            return Err(CheckoutError::InvalidTransition {
                from: self.step,
                action: "place the order",
            });
        }

        self.order_number = format!("ORD-{}", Uuid::new_v4().simple());
        self.step = CheckoutStep::Confirmation;
        Ok(self.order_number.clone())
    }

    /// Moves one step backward (Payment → Shipping or Review → Payment)
    /// without erasing previously entered data. Confirmation is terminal;
    /// only [`restart`](Self::restart) leaves it.
    pub fn back(&mut self) -> Result<(), CheckoutError> {
        self.step = match self.step {
            CheckoutStep::Payment => CheckoutStep::Shipping,
            CheckoutStep::Review => CheckoutStep::Payment,
            step => {
                return Err(CheckoutError::InvalidTransition {
                    from: step,
                    action: "go back",
                })
            }
        };
        Ok(())
    }

    /// Resets the wizard to its initial state: shipping step, no shipping or
    /// payment data, empty order number.
    pub fn restart(&mut self) {
        *self = Self::new();
    }
}
