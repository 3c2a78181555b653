//! Storefront Checkout - Checkout orchestration for an online storefront
//!
//! This library drives a single-product checkout: card entry and
//! tokenization, delivery details, order submission, and following the order
//! status until it settles.

pub mod application;
pub mod config;
pub mod domain;
pub mod driver;
pub mod infrastructure;
pub mod shared;

#[cfg(test)]
mod tests;

pub use application::{CheckoutError, CheckoutSession, CheckoutView, PollerHandle, ResultView, StatusPoller};
pub use config::AppConfig;
pub use shared::error::{AppError, AppResult};
pub use shared::normalizer::{normalize, NormalizedError};

/// Application result type
pub type Result<T> = std::result::Result<T, shared::error::AppError>;
