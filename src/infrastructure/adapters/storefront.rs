//! Storefront API client
//!
//! Order submission, order status lookup and the catalog reads the driver
//! needs to pick a product.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::http::{build_client, endpoint, read_json};
use crate::config::app_config::ApiConfig;
use crate::domain::catalog::Product;
use crate::domain::order::{OrderRecord, OrderRequest};
use crate::domain::ports::{OrderGateway, ProductCatalog};
use crate::shared::error::AppResult;
use crate::shared::logging::LoggingUtils;
use crate::shared::normalizer::{normalize, ApiFailure, NormalizedError};

pub struct StorefrontApiClient {
    http_client: Client,
    base_url: String,
}

impl StorefrontApiClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        Ok(Self {
            http_client: build_client(config.timeout_seconds)?,
            base_url: config.base_url.clone(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiFailure> {
        let url = endpoint(&self.base_url, path);
        debug!(url = %url, "GET");
        let response = self.http_client.get(&url).send().await?;
        read_json(response).await
    }

    async fn post_order(&self, order: &OrderRequest) -> Result<OrderRecord, ApiFailure> {
        let url = endpoint(&self.base_url, "order");
        debug!(url = %url, items = order.products.len(), "POST order");
        let response = self.http_client.post(&url).json(order).send().await?;
        read_json(response).await
    }
}

/// Normalize and log a failed call
fn failed(operation: &str, failure: ApiFailure) -> NormalizedError {
    let error = normalize(failure);
    LoggingUtils::log_remote_failure(operation, &error);
    error
}

#[async_trait]
impl OrderGateway for StorefrontApiClient {
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderRecord, NormalizedError> {
        let record = self
            .post_order(order)
            .await
            .map_err(|failure| failed("submit_order", failure))?;

        info!(order_id = %record.order_id, status = %record.status, "Order created");
        Ok(record)
    }

    async fn fetch_order(&self, order_id: &str) -> Result<OrderRecord, NormalizedError> {
        let record: OrderRecord = self
            .get(&format!("order/{}", order_id))
            .await
            .map_err(|failure| failed("fetch_order", failure))?;

        debug!(order_id = %record.order_id, status = %record.status, "Order status fetched");
        Ok(record)
    }
}

#[async_trait]
impl ProductCatalog for StorefrontApiClient {
    async fn list_products(&self) -> Result<Vec<Product>, NormalizedError> {
        self.get("products")
            .await
            .map_err(|failure| failed("list_products", failure))
    }

    async fn get_product(&self, product_id: &str) -> Result<Product, NormalizedError> {
        self.get(&format!("product/{}", product_id))
            .await
            .map_err(|failure| failed("get_product", failure))
    }
}
