//! Form Validation Rules
//!
//! Pure, stateless field validators for the shipping and payment forms.
//! Aggregate validators return a list of [`FieldError`]s, one per failing
//! field at most (the required check wins over the format check); an empty
//! list means the form is valid.

use super::models::{FieldError, PaymentInfo, ShippingInfo};
use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s\-()]{10,}$").expect("valid regex"));

static CARD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{13,19}$").expect("valid regex"));

static EXPIRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0[1-9]|1[0-2])/[0-9]{2}$").expect("valid regex"));

static CVV_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{3,4}$").expect("valid regex"));

/// `local@domain.tld` shape: no whitespace or extra `@`, a dot in the domain.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Optional leading `+`, then at least 10 characters drawn from digits,
/// spaces, hyphens and parentheses.
pub fn validate_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// 13-19 decimal digits after stripping whitespace separators.
pub fn validate_card_number(card_number: &str) -> bool {
    let cleaned: String = card_number.chars().filter(|c| !c.is_whitespace()).collect();
    CARD_RE.is_match(&cleaned)
}

/// Strict `MM/YY`, not already expired against the local wall clock.
pub fn validate_expiry_date(expiry: &str) -> bool {
    validate_expiry_date_at(expiry, Local::now().date_naive())
}

/// Expiry check against an explicit date, so callers and tests are not tied
/// to the wall clock. The card is valid through the end of its expiry month.
pub fn validate_expiry_date_at(expiry: &str, today: NaiveDate) -> bool {
    if !EXPIRY_RE.is_match(expiry) {
        return false;
    }

    let Some((month, year)) = expiry.split_once('/') else {
        return false;
    };
    let Ok(card_month) = month.parse::<u32>() else {
        return false;
    };
    let Ok(card_year) = year.parse::<i32>() else {
        return false;
    };

    let current_year = today.year() % 100;
    let current_month = today.month();

    if card_year < current_year {
        return false;
    }
    if card_year == current_year && card_month < current_month {
        return false;
    }

    true
}

/// 3-4 decimal digits.
pub fn validate_cvv(cvv: &str) -> bool {
    CVV_RE.is_match(cvv)
}

/// Validates the shipping form. Required fields are checked after trimming
/// whitespace; email and phone additionally must match their format rules.
pub fn validate_shipping_info(info: &ShippingInfo) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if info.first_name.trim().is_empty() {
        errors.push(FieldError::new("firstName", "First name is required"));
    }

    if info.last_name.trim().is_empty() {
        errors.push(FieldError::new("lastName", "Last name is required"));
    }

    if info.email.trim().is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !validate_email(&info.email) {
        errors.push(FieldError::new("email", "Invalid email format"));
    }

    if info.phone.trim().is_empty() {
        errors.push(FieldError::new("phone", "Phone number is required"));
    } else if !validate_phone(&info.phone) {
        errors.push(FieldError::new("phone", "Invalid phone number"));
    }

    if info.address.trim().is_empty() {
        errors.push(FieldError::new("address", "Address is required"));
    }

    if info.city.trim().is_empty() {
        errors.push(FieldError::new("city", "City is required"));
    }

    if info.state.trim().is_empty() {
        errors.push(FieldError::new("state", "State is required"));
    }

    if info.zip_code.trim().is_empty() {
        errors.push(FieldError::new("zipCode", "ZIP code is required"));
    }

    errors
}

/// Validates the payment form: cardholder name required, then
/// required-then-format checks for card number, expiry date and CVV.
pub fn validate_payment_info(info: &PaymentInfo) -> Vec<FieldError> {
    validate_payment_info_at(info, Local::now().date_naive())
}

/// Payment form validation against an explicit date, for deterministic
/// expiry checks in tests.
pub fn validate_payment_info_at(info: &PaymentInfo, today: NaiveDate) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if info.cardholder_name.trim().is_empty() {
        errors.push(FieldError::new(
            "cardholderName",
            "Cardholder name is required",
        ));
    }

    if info.card_number.trim().is_empty() {
        errors.push(FieldError::new("cardNumber", "Card number is required"));
    } else if !validate_card_number(&info.card_number) {
        errors.push(FieldError::new("cardNumber", "Invalid card number"));
    }

    if info.expiry_date.trim().is_empty() {
        errors.push(FieldError::new("expiryDate", "Expiry date is required"));
    } else if !validate_expiry_date_at(&info.expiry_date, today) {
        errors.push(FieldError::new("expiryDate", "Invalid or expired date"));
    }

    if info.cvv.trim().is_empty() {
        errors.push(FieldError::new("cvv", "CVV is required"));
    } else if !validate_cvv(&info.cvv) {
        errors.push(FieldError::new("cvv", "Invalid CVV"));
    }

    errors
}
