//! Test suite for the storefront checkout
//!
//! - `common`: fake collaborators and fixtures
//! - `unit`: state machine rules exercised in isolation
//! - `integration`: end-to-end checkout scenarios, including the timer-driven
//!   status poller

pub mod common;
pub mod integration;

/// Test configuration and utilities
pub mod config {
    use crate::config::AppConfig;
    use std::sync::Once;

    static INIT: Once = Once::new();

    /// Initialize test environment
    pub fn init() {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter("debug")
                .with_test_writer()
                .try_init();
        });
    }

    /// Create test configuration
    pub fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.api.base_url = "http://127.0.0.1:3000".to_string();
        config.tokenization.base_url = "http://127.0.0.1:3001/v1".to_string();
        config.session.device_id = Some("device-test".to_string());
        config.session.session_id = Some("session-test".to_string());
        config
    }
}

/// Test utilities and helpers
pub mod utils {
    use std::time::Duration;
    use tokio::time::sleep;

    /// Wait for a condition to be true
    pub async fn wait_for<F>(mut condition: F, timeout: Duration) -> bool
    where
        F: FnMut() -> bool,
    {
        let start = tokio::time::Instant::now();
        while start.elapsed() < timeout {
            if condition() {
                return true;
            }
            sleep(Duration::from_millis(1)).await;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_initialization() {
        config::init();
        let test_config = config::test_config();
        assert!(test_config.validate_config().is_ok());
        assert_eq!(test_config.widget_session().device_id.as_deref(), Some("device-test"));
    }
}
