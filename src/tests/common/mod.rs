//! Common test utilities and fake collaborators
//!
//! The fakes answer from queues filled by the test and count every call.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::card::CreditCard;
use crate::domain::order::{OrderRecord, OrderRequest, OrderStatus};
use crate::domain::ports::{CardTokenizer, OrderGateway};
use crate::domain::session::TokenReference;
use crate::shared::normalizer::{normalize, ApiFailure, NormalizedError};

/// Connectivity failure exactly as the HTTP adapters report it
pub fn network_error() -> NormalizedError {
    normalize(ApiFailure::NoResponse {
        reason: "error sending request: connection refused".to_string(),
    })
}

/// Tokenizer answering from a queue; an empty queue yields `tok_test`
#[derive(Default)]
pub struct FakeTokenizer {
    responses: Mutex<VecDeque<Result<TokenReference, NormalizedError>>>,
    calls: AtomicU32,
    gate: Option<Arc<Notify>>,
}

impl FakeTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call waits for a notification before answering
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn push(&self, response: Result<TokenReference, NormalizedError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CardTokenizer for FakeTokenizer {
    async fn tokenize(&self, _card: &CreditCard) -> Result<TokenReference, NormalizedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(TokenReference::new("tok_test")))
    }
}

/// Order gateway answering from queues
///
/// Without a queued answer, submissions create `ord_test` as PENDING and
/// fetches report the order as PENDING.
#[derive(Default)]
pub struct FakeOrderGateway {
    submissions: Mutex<VecDeque<Result<OrderRecord, NormalizedError>>>,
    fetches: Mutex<VecDeque<Result<OrderRecord, NormalizedError>>>,
    submitted: Mutex<Vec<OrderRequest>>,
    submit_calls: AtomicU32,
    fetch_calls: AtomicU32,
    gate: Option<Arc<Notify>>,
}

impl FakeOrderGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every submission waits for a notification before answering
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn push_submission(&self, response: Result<OrderRecord, NormalizedError>) {
        self.submissions.lock().unwrap().push_back(response);
    }

    pub fn push_fetch(&self, record: OrderRecord) {
        self.fetches.lock().unwrap().push_back(Ok(record));
    }

    pub fn push_fetch_error(&self, error: NormalizedError) {
        self.fetches.lock().unwrap().push_back(Err(error));
    }

    pub fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> u32 {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn last_submitted(&self) -> Option<OrderRequest> {
        self.submitted.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl OrderGateway for FakeOrderGateway {
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderRecord, NormalizedError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(order.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.submissions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(OrderRecord::new("ord_test", OrderStatus::Pending)))
    }

    async fn fetch_order(&self, order_id: &str) -> Result<OrderRecord, NormalizedError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fetches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(OrderRecord::new(order_id, OrderStatus::Pending)))
    }
}

/// Test data fixtures
pub mod fixtures {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::{FakeOrderGateway, FakeTokenizer};
    use crate::application::checkout::CheckoutSession;
    use crate::domain::card::CreditCard;
    use crate::domain::catalog::Product;
    use crate::domain::delivery::DeliveryInfo;
    use crate::domain::order::FeeSchedule;
    use crate::domain::session::PaymentContext;

    /// Date the card fixtures are validated against
    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    pub fn product() -> Product {
        Product {
            id: "64f1c0ffee".to_string(),
            name: "Wireless headphones".to_string(),
            description: "Over-ear, noise cancelling".to_string(),
            price: dec!(120000),
            stock: 4,
            image_url: "https://cdn.example.com/headphones.png".to_string(),
        }
    }

    pub fn fees() -> FeeSchedule {
        FeeSchedule {
            order_fee: dec!(0),
            delivery_fee: dec!(8500),
        }
    }

    pub fn card() -> CreditCard {
        CreditCard::new("4111 1111 1111 1111", "JOHN DOE", "12/25", "123")
    }

    pub fn delivery() -> DeliveryInfo {
        DeliveryInfo::new(
            "John Doe",
            "Carrera 7 # 71-21",
            "Bogota",
            "110231",
            "3105550101",
            "john.doe@example.com",
        )
    }

    pub fn context() -> PaymentContext {
        PaymentContext::new(Some("device-123".to_string()), Some("session-456".to_string()))
    }

    /// Session for two units of [`product`] with the clock pinned to [`today`]
    pub fn session(tokenizer: Arc<FakeTokenizer>, gateway: Arc<FakeOrderGateway>) -> CheckoutSession {
        CheckoutSession::start(product(), 2, &fees(), context(), tokenizer, gateway)
            .unwrap()
            .with_clock(today)
    }
}
