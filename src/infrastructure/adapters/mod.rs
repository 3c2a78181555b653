//! Infrastructure adapters module
//!
//! This module contains adapters for the external services the checkout
//! talks to.

mod http;
pub mod storefront;
pub mod tokenization;
pub mod widget;

// Re-export all adapters
pub use storefront::StorefrontApiClient;
pub use tokenization::{CardTokenRequest, TokenizationClient};
pub use widget::ConfiguredSessionInitializer;
