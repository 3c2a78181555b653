//! Boundaries to the external services the checkout depends on

use async_trait::async_trait;

use super::card::CreditCard;
use super::catalog::Product;
use super::order::{OrderRecord, OrderRequest};
use super::session::{TokenReference, WidgetSession};
use crate::shared::normalizer::NormalizedError;

#[async_trait]
pub trait CardTokenizer: Send + Sync {
    async fn tokenize(&self, card: &CreditCard) -> Result<TokenReference, NormalizedError>;
}

#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderRecord, NormalizedError>;
    async fn fetch_order(&self, order_id: &str) -> Result<OrderRecord, NormalizedError>;
}

#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, NormalizedError>;
    async fn get_product(&self, product_id: &str) -> Result<Product, NormalizedError>;
}

/// One-shot initialization of the payment widget, run before checkout starts.
#[async_trait]
pub trait SessionInitializer: Send + Sync {
    async fn initialize(&self) -> Result<WidgetSession, NormalizedError>;
}
