//! Configuration validation module
//!
//! This module provides additional validation logic for configuration
//! beyond the basic validator crate validation.

use rust_decimal::Decimal;

use crate::config::app_config::{AppConfig, CheckoutConfig, LoggingConfig};
use crate::shared::error::AppError;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration validator for additional validation logic
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the complete configuration
    pub fn validate_config(config: &AppConfig) -> crate::Result<()> {
        Self::validate_api_url(&config.api.base_url)?;
        Self::validate_tokenization_url(&config.tokenization.base_url)?;
        Self::validate_checkout_config(&config.checkout)?;
        Self::validate_logging_config(&config.logging)?;

        if config.session.device_id.is_none() || config.session.session_id.is_none() {
            tracing::warn!("Payment widget identifiers are not configured; orders will be sent without them");
        }

        Ok(())
    }

    /// Validate the storefront API URL
    fn validate_api_url(url: &str) -> crate::Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AppError::Validation(
                "Storefront API URL must start with http:// or https://".to_string()
            ));
        }
        Ok(())
    }

    /// Validate the tokenization URL; card data only travels over HTTPS unless local
    fn validate_tokenization_url(url: &str) -> crate::Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AppError::Validation(
                "Tokenization URL must start with http:// or https://".to_string()
            ));
        }

        if url.contains("localhost") || url.contains("127.0.0.1") {
            // Allow localhost for development
            Ok(())
        } else if !url.starts_with("https://") {
            Err(AppError::Validation(
                "Tokenization URL must use HTTPS".to_string()
            ))
        } else {
            Ok(())
        }
    }

    /// Validate fee settings
    fn validate_checkout_config(checkout: &CheckoutConfig) -> crate::Result<()> {
        if checkout.order_fee < Decimal::ZERO {
            return Err(AppError::Validation(
                "Order fee must not be negative".to_string()
            ));
        }

        if checkout.delivery_fee < Decimal::ZERO {
            return Err(AppError::Validation(
                "Delivery fee must not be negative".to_string()
            ));
        }

        Ok(())
    }

    /// Validate logging level and format
    fn validate_logging_config(logging: &LoggingConfig) -> crate::Result<()> {
        if !LOG_LEVELS.contains(&logging.level.to_ascii_lowercase().as_str()) {
            return Err(AppError::Validation(
                format!("Invalid log level: {}", logging.level)
            ));
        }

        if !["text", "json"].contains(&logging.format.to_ascii_lowercase().as_str()) {
            return Err(AppError::Validation(
                format!("Invalid log format: {}", logging.format)
            ));
        }

        Ok(())
    }
}
