//! Card tokenization adapter
//!
//! Exchanges raw card data for an opaque token at the payment provider.
//! The card number never leaves this adapter in any other form.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::http::{build_client, endpoint, read_json};
use crate::config::app_config::TokenizationConfig;
use crate::domain::card::{split_expiry, CreditCard};
use crate::domain::ports::CardTokenizer;
use crate::domain::session::TokenReference;
use crate::shared::error::AppResult;
use crate::shared::logging::LoggingUtils;
use crate::shared::normalizer::{normalize, ApiFailure, NormalizedError};

/// Body of `POST /tokens/cards`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTokenRequest {
    pub number: String,
    pub exp_month: String,
    pub exp_year: String,
    pub cvc: String,
    pub card_holder: String,
}

impl CardTokenRequest {
    pub fn from_card(card: &CreditCard) -> Result<Self, ApiFailure> {
        let (exp_month, exp_year) = split_expiry(&card.expiry)
            .ok_or_else(|| ApiFailure::error("Card expiry must use the MM/YY format"))?;

        Ok(Self {
            number: card.digits(),
            exp_month,
            exp_year,
            cvc: card.security_code.clone(),
            card_holder: card.holder_name.trim().to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    data: Option<TokenData>,
}

#[derive(Debug, Deserialize)]
struct TokenData {
    id: Option<String>,
}

/// Tokenization client for the payment provider
pub struct TokenizationClient {
    http_client: Client,
    url: String,
    public_key: String,
}

impl TokenizationClient {
    /// Create a new tokenization client
    pub fn new(config: &TokenizationConfig) -> AppResult<Self> {
        Ok(Self {
            http_client: build_client(config.timeout_seconds)?,
            url: endpoint(&config.base_url, "tokens/cards"),
            public_key: config.public_key.clone(),
        })
    }

    async fn request_token(&self, card: &CreditCard) -> Result<TokenReference, ApiFailure> {
        let request = CardTokenRequest::from_card(card)?;

        debug!(url = %self.url, card = %card.masked_number(), "Requesting card token");

        let response = self
            .http_client
            .post(&self.url)
            .bearer_auth(&self.public_key)
            .json(&request)
            .send()
            .await?;

        let body: TokenResponse = read_json(response).await?;

        body.data
            .and_then(|data| data.id)
            .filter(|id| !id.is_empty())
            .map(TokenReference::new)
            .ok_or_else(|| ApiFailure::error("Token response did not include an id"))
    }
}

#[async_trait]
impl CardTokenizer for TokenizationClient {
    async fn tokenize(&self, card: &CreditCard) -> Result<TokenReference, NormalizedError> {
        match self.request_token(card).await {
            Ok(token) => {
                info!(card = %card.masked_number(), brand = %card.brand().as_str(), "Card tokenized");
                Ok(token)
            }
            Err(failure) => {
                let error = normalize(failure);
                LoggingUtils::log_remote_failure("tokenize", &error);
                Err(error)
            }
        }
    }
}
