//! Card data entered by the shopper and the helpers that shape it

use serde::{Deserialize, Serialize};

/// Number of digits a card number must normalize to.
pub const CARD_NUMBER_DIGITS: usize = 16;

/// Card details as typed into the payment step.
///
/// Values are kept exactly as entered (the number may contain spaces)
/// so that returning to the card step shows what the shopper typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCard {
    pub number: String,
    #[serde(alias = "name")]
    pub holder_name: String,
    /// `MM/YY`
    pub expiry: String,
    #[serde(alias = "cvc")]
    pub security_code: String,
}

/// Card networks accepted by the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Unknown,
}

impl CardBrand {
    /// Detect the brand from the leading digit.
    pub fn detect(number: &str) -> Self {
        match normalize_number(number).chars().next() {
            Some('4') => CardBrand::Visa,
            Some('5') => CardBrand::Mastercard,
            _ => CardBrand::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CardBrand::Visa => "visa",
            CardBrand::Mastercard => "mastercard",
            CardBrand::Unknown => "unknown",
        }
    }
}

impl CreditCard {
    pub fn new(
        number: impl Into<String>,
        holder_name: impl Into<String>,
        expiry: impl Into<String>,
        security_code: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            holder_name: holder_name.into(),
            expiry: expiry.into(),
            security_code: security_code.into(),
        }
    }

    /// Card number with separators removed.
    pub fn digits(&self) -> String {
        normalize_number(&self.number)
    }

    pub fn brand(&self) -> CardBrand {
        CardBrand::detect(&self.number)
    }

    /// `**** **** **** 1111`
    pub fn masked_number(&self) -> String {
        let chars: Vec<char> = self.digits().chars().collect();
        let start = chars.len().saturating_sub(4);
        let last_four: String = chars[start..].iter().collect();
        format!("**** **** **** {}", last_four)
    }
}

/// Strip the separators a shopper may type between digit groups.
pub fn normalize_number(number: &str) -> String {
    number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Format raw input as grouped card digits, e.g. `4111 1111 1111 1111`.
///
/// Non-digits are dropped and the result is capped at sixteen digits.
pub fn format_card_number(input: &str) -> String {
    let digits: Vec<char> = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(CARD_NUMBER_DIGITS)
        .collect();

    digits
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format raw input as `MM/YY` once at least three digits are present.
pub fn format_expiry(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).take(4).collect();
    if digits.len() >= 3 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

/// Split `MM/YY` into trimmed month and year parts.
pub fn split_expiry(expiry: &str) -> Option<(String, String)> {
    let (month, year) = expiry.split_once('/')?;
    Some((month.trim().to_string(), year.trim().to_string()))
}
