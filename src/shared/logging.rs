//! Logging utilities module
//!
//! This module provides centralized logging functionality and the
//! structured events emitted along the checkout flow.

use tracing::{info, warn};

use crate::shared::error::AppError;
use crate::shared::normalizer::NormalizedError;

/// Logging utilities for the application
pub struct LoggingUtils;

impl LoggingUtils {
    /// Initialize logging with the specified level and format (`text` or `json`)
    pub fn initialize(level: &str, format: &str) -> crate::Result<()> {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level));

        let builder = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false);

        let result = if format.eq_ignore_ascii_case("json") {
            tracing::subscriber::set_global_default(builder.json().finish())
        } else {
            tracing::subscriber::set_global_default(builder.finish())
        };

        result.map_err(|e| AppError::Internal(format!("Failed to initialize logging: {}", e)))
    }

    /// Log a step transition of a checkout session
    pub fn log_transition(session_id: &str, from: &str, to: &str) {
        info!(
            session_id = %session_id,
            from = %from,
            to = %to,
            "Checkout step changed"
        );
    }

    /// Log a failed call to an external endpoint, details included
    pub fn log_remote_failure(operation: &str, error: &NormalizedError) {
        warn!(
            operation = %operation,
            code = %error.code,
            message = %error.message,
            details = ?error.details,
            "External call failed"
        );
    }
}
