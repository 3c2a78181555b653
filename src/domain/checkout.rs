//! Checkout steps

use serde::{Deserialize, Serialize};

/// Steps of the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    /// Card details.
    Card,
    /// Delivery details.
    Delivery,
    /// Review before paying.
    Summary,
    /// Order submission in flight.
    Submitting,
    /// Order placed; its status is shown.
    Result,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Card => "card",
            CheckoutStep::Delivery => "delivery",
            CheckoutStep::Summary => "summary",
            CheckoutStep::Submitting => "submitting",
            CheckoutStep::Result => "result",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CheckoutStep::Card => "Payment information",
            CheckoutStep::Delivery => "Delivery information",
            CheckoutStep::Summary | CheckoutStep::Submitting => "Payment summary",
            CheckoutStep::Result => "Payment result",
        }
    }

    /// Position in the three-step indicator (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Card => 1,
            CheckoutStep::Delivery => 2,
            CheckoutStep::Summary | CheckoutStep::Submitting | CheckoutStep::Result => 3,
        }
    }

    /// Whether `other` is already behind this step in the indicator.
    pub fn has_completed(&self, other: CheckoutStep) -> bool {
        other.number() < self.number() || (*self == CheckoutStep::Result && other != CheckoutStep::Result)
    }

    /// The step a back action returns to, if any.
    pub fn previous(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Delivery => Some(CheckoutStep::Card),
            CheckoutStep::Summary => Some(CheckoutStep::Delivery),
            _ => None,
        }
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
