//! Application configuration structures
//!
//! This module contains the main configuration structures for the application.

use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::order::FeeSchedule;
use crate::domain::session::WidgetSession;
use crate::shared::error::AppError;

/// Storefront API configuration (products and orders)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL (e.g., "http://localhost:3000")
    #[validate(url)]
    pub base_url: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub timeout_seconds: u64,
}

/// Card tokenization service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TokenizationConfig {
    /// Base URL of the payment provider API
    #[validate(url)]
    pub base_url: String,

    /// Public key sent as bearer credential
    #[validate(length(min = 1))]
    pub public_key: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub timeout_seconds: u64,
}

/// Checkout behaviour
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Fixed fee charged per order
    pub order_fee: Decimal,

    /// Fixed delivery fee
    pub delivery_fee: Decimal,

    /// Countdown length, in ticks, between status refreshes and before redirecting
    #[validate(range(min = 1, max = 600))]
    pub countdown_ticks: u32,

    /// Tick length in milliseconds
    #[validate(range(min = 10, max = 60000))]
    pub tick_millis: u64,
}

/// Identifiers handed over by the host's payment widget
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub device_id: Option<String>,
    pub session_id: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[validate(length(min = 1))]
    pub level: String,

    /// Log format (json, text)
    #[validate(length(min = 1))]
    pub format: String,
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Storefront API configuration
    pub api: ApiConfig,

    /// Tokenization service configuration
    pub tokenization: TokenizationConfig,

    /// Checkout configuration
    pub checkout: CheckoutConfig,

    /// Payment widget session identifiers
    pub session: SessionConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for TokenizationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sandbox.wompi.co/v1".to_string(),
            public_key: "test_public_key".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            order_fee: Decimal::ZERO,
            delivery_fee: dec!(8500),
            countdown_ticks: 10,
            tick_millis: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Without an explicit path an optional `Checkout.{toml,yaml,json}` in the
    /// working directory is read. `STOREFRONT__*` variables override both.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("Checkout").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("STOREFRONT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build configuration: {}", e)))?;

        let config: AppConfig = config
            .try_deserialize()
            .map_err(|e| AppError::Config(format!("Failed to deserialize configuration: {}", e)))?;

        config
            .validate_config()
            .map_err(|e| AppError::Validation(format!("Configuration validation failed: {}", e)))?;

        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate_config(&self) -> crate::Result<()> {
        self.api.validate()?;
        self.tokenization.validate()?;
        self.checkout.validate()?;
        self.logging.validate()?;

        crate::config::ConfigValidator::validate_config(self)
    }

    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule {
            order_fee: self.checkout.order_fee,
            delivery_fee: self.checkout.delivery_fee,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.checkout.tick_millis)
    }

    pub fn widget_session(&self) -> WidgetSession {
        WidgetSession {
            device_id: self.session.device_id.clone(),
            session_id: self.session.session_id.clone(),
        }
    }
}
