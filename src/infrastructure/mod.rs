//! Infrastructure layer - External concerns and adapters
//!
//! This module contains the HTTP clients for the tokenization and storefront
//! APIs and the payment widget session initializer.

pub mod adapters;

// Re-export main adapters
pub use adapters::{ConfiguredSessionInitializer, StorefrontApiClient, TokenizationClient};
