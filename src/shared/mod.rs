//! Shared utilities and common functionality
//!
//! This module contains error handling, error normalization and logging
//! used across the application.

pub mod error;
pub mod logging;
pub mod normalizer;

pub use error::{AppError, AppResult};
pub use logging::LoggingUtils;
pub use normalizer::{normalize, ApiFailure, FailureKind, NormalizedError};
