//! Shared plumbing for the reqwest-backed adapters

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::shared::error::AppResult;
use crate::shared::normalizer::ApiFailure;

const USER_AGENT: &str = concat!("storefront-checkout/", env!("CARGO_PKG_VERSION"));

/// Build an HTTP client with the given timeout
pub(crate) fn build_client(timeout_seconds: u64) -> AppResult<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(USER_AGENT)
        .pool_idle_timeout(Duration::from_secs(30))
        .build()?;
    Ok(client)
}

/// Join a base URL and a path without doubling slashes
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Read a JSON body, turning non-success statuses into [`ApiFailure::Response`]
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiFailure> {
    let status = response.status();

    if !status.is_success() {
        // the status line arrived, so a broken body still counts as a server answer
        let body = match response.bytes().await {
            Ok(bytes) => serde_json::from_slice::<Value>(&bytes).ok(),
            Err(_) => None,
        };
        return Err(ApiFailure::Response {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
