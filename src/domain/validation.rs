//! Field validation for card and delivery data
//!
//! Pure functions: each check runs independently and every violation is
//! reported, so the form can highlight all offending fields at once. An
//! empty list means the input is valid.

use std::sync::LazyLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::card::{normalize_number, CreditCard};
use crate::domain::delivery::DeliveryInfo;

static CARD_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{16}$").expect("valid regex"));
static EXPIRY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/[0-9]{2}$").expect("valid regex"));
static SECURITY_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{3,4}$").expect("valid regex"));
static ZIP_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{5,6}$").expect("valid regex"));
static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{7,15}$").expect("valid regex"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// A single violation tied to the form field that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate card data against today's local date.
pub fn validate_card(card: &CreditCard) -> Vec<FieldError> {
    validate_card_at(card, Local::now().date_naive())
}

/// Validate card data against the given date.
pub fn validate_card_at(card: &CreditCard, today: NaiveDate) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if !CARD_NUMBER.is_match(&normalize_number(&card.number)) {
        errors.push(FieldError::new(
            "number",
            "Invalid card number. It must have 16 digits.",
        ));
    }

    // Only presence is checked for the holder. The three-character minimum
    // applies to the delivery name, not here.
    if card.holder_name.trim().is_empty() {
        errors.push(FieldError::new("name", "Card holder name is required."));
    }

    if !EXPIRY.is_match(&card.expiry) {
        errors.push(FieldError::new(
            "expiry",
            "Invalid expiry date. Use the MM/YY format.",
        ));
    } else if is_expired(&card.expiry, today) {
        errors.push(FieldError::new("expiry", "The card has expired."));
    }

    if !SECURITY_CODE.is_match(&card.security_code) {
        errors.push(FieldError::new(
            "cvc",
            "Invalid security code. It must have 3 or 4 digits.",
        ));
    }

    errors
}

/// A card stays valid through the last day of its expiry month.
fn is_expired(expiry: &str, today: NaiveDate) -> bool {
    let Some((month, year)) = expiry.split_once('/') else {
        return true;
    };
    let (Ok(month), Ok(year)) = (month.parse::<u32>(), year.parse::<i32>()) else {
        return true;
    };
    (2000 + year, month) < (today.year(), today.month())
}

/// Validate delivery details.
pub fn validate_delivery(info: &DeliveryInfo) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if info.full_name.trim().chars().count() < 3 {
        errors.push(FieldError::new(
            "fullName",
            "Full name is required (at least 3 characters).",
        ));
    }

    if info.address.trim().chars().count() < 5 {
        errors.push(FieldError::new(
            "address",
            "Address is required (at least 5 characters).",
        ));
    }

    if info.city.trim().is_empty() {
        errors.push(FieldError::new("city", "City is required."));
    }

    if !ZIP_CODE.is_match(&info.zip_code) {
        errors.push(FieldError::new("zipCode", "Invalid zip code."));
    }

    if !PHONE.is_match(&info.phone) {
        errors.push(FieldError::new(
            "phone",
            "Invalid phone number (digits only, 7-15 digits).",
        ));
    }

    if !EMAIL.is_match(&info.email) {
        errors.push(FieldError::new("email", "Invalid email address."));
    }

    errors
}
