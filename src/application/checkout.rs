//! Checkout session state machine
//!
//! Drives one checkout from card entry to the placed order:
//!
//! ```text
//! Card -> Delivery -> Summary -> (Submitting) -> Result
//!   ^--------back------'  ^--back--'
//! ```
//!
//! Entered data is kept on every failure and on back navigation. At most one
//! outbound call (tokenization or order submission) runs per session; a
//! second attempt while one is in flight is rejected with
//! [`CheckoutError::Busy`].

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::status_poller::StatusPoller;
use crate::domain::card::CreditCard;
use crate::domain::catalog::Product;
use crate::domain::checkout::CheckoutStep;
use crate::domain::delivery::DeliveryInfo;
use crate::domain::order::{FeeSchedule, OrderRecord, OrderRequest, PaymentSummary};
use crate::domain::ports::{CardTokenizer, OrderGateway};
use crate::domain::session::PaymentContext;
use crate::domain::validation::{validate_card_at, validate_delivery, FieldError};
use crate::shared::logging::LoggingUtils;
use crate::shared::normalizer::NormalizedError;

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Why a checkout action did not advance the session
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckoutError {
    #[error("Invalid input: {}", describe_fields(.0))]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Remote(NormalizedError),

    #[error("Another request is already in progress")]
    Busy,

    #[error("Cannot {action} during the {step} step")]
    InvalidStep {
        step: CheckoutStep,
        action: &'static str,
    },
}

fn describe_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Point-in-time copy of what the checkout form shows
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutView {
    pub step: CheckoutStep,
    pub card: Option<CreditCard>,
    pub delivery: Option<DeliveryInfo>,
    pub order: Option<OrderRecord>,
    pub error: Option<NormalizedError>,
    pub field_errors: Vec<FieldError>,
    pub loading: bool,
}

#[derive(Debug)]
struct SessionState {
    step: CheckoutStep,
    card: Option<CreditCard>,
    delivery: Option<DeliveryInfo>,
    context: PaymentContext,
    order: Option<OrderRecord>,
    last_error: Option<NormalizedError>,
    field_errors: Vec<FieldError>,
}

impl SessionState {
    fn new(context: PaymentContext) -> Self {
        Self {
            step: CheckoutStep::Card,
            card: None,
            delivery: None,
            context,
            order: None,
            last_error: None,
            field_errors: Vec::new(),
        }
    }

    fn require_step(&self, expected: CheckoutStep, action: &'static str) -> Result<(), CheckoutError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CheckoutError::InvalidStep { step: self.step, action })
        }
    }
}

/// Clears the loading flag when the in-flight call ends, however it ends.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, CheckoutError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| CheckoutError::Busy)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One checkout of one product
pub struct CheckoutSession {
    id: String,
    product: Product,
    summary: PaymentSummary,
    tokenizer: Arc<dyn CardTokenizer>,
    gateway: Arc<dyn OrderGateway>,
    clock: Clock,
    loading: AtomicBool,
    /// Bumped by [`close`](Self::close); results of calls started under an
    /// older generation are dropped.
    generation: AtomicU64,
    state: Mutex<SessionState>,
}

impl CheckoutSession {
    /// Start a checkout for `quantity` units of `product`
    pub fn start(
        product: Product,
        quantity: u32,
        fees: &FeeSchedule,
        context: PaymentContext,
        tokenizer: Arc<dyn CardTokenizer>,
        gateway: Arc<dyn OrderGateway>,
    ) -> Result<Self, CheckoutError> {
        let summary = PaymentSummary::compute(&product, quantity, fees)
            .map_err(|e| CheckoutError::Validation(vec![e]))?;

        let id = Uuid::new_v4().to_string();
        info!(
            session_id = %id,
            product_id = %product.id,
            quantity = quantity,
            total = %summary.total(),
            "Checkout session started"
        );

        Ok(Self {
            id,
            product,
            summary,
            tokenizer,
            gateway,
            clock: Arc::new(|| Local::now().date_naive()),
            loading: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            state: Mutex::new(SessionState::new(context)),
        })
    }

    /// Replace the date source used for card expiry checks
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn summary(&self) -> &PaymentSummary {
        &self.summary
    }

    /// Whether a tokenization or order call is in flight
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Current step; `Submitting` while the order call is in flight
    pub async fn step(&self) -> CheckoutStep {
        let state = self.state.lock().await;
        self.visible_step(state.step)
    }

    pub async fn has_token(&self) -> bool {
        self.state.lock().await.context.token().is_some()
    }

    pub async fn snapshot(&self) -> CheckoutView {
        let state = self.state.lock().await;
        CheckoutView {
            step: self.visible_step(state.step),
            card: state.card.clone(),
            delivery: state.delivery.clone(),
            order: state.order.clone(),
            error: state.last_error.clone(),
            field_errors: state.field_errors.clone(),
            loading: self.is_loading(),
        }
    }

    fn visible_step(&self, step: CheckoutStep) -> CheckoutStep {
        if step == CheckoutStep::Summary && self.is_loading() {
            CheckoutStep::Submitting
        } else {
            step
        }
    }

    fn transition(&self, state: &mut SessionState, to: CheckoutStep) {
        LoggingUtils::log_transition(&self.id, state.step.as_str(), to.as_str());
        state.step = to;
    }

    /// Validate and tokenize the card, then move on to delivery
    pub async fn submit_card(&self, card: CreditCard) -> Result<(), CheckoutError> {
        let _loading = LoadingGuard::acquire(&self.loading)?;
        let generation = self.generation.load(Ordering::Acquire);

        {
            let mut state = self.state.lock().await;
            state.require_step(CheckoutStep::Card, "submit card details")?;
            state.card = Some(card.clone());
            state.last_error = None;

            let errors = validate_card_at(&card, (self.clock)());
            if !errors.is_empty() {
                debug!(session_id = %self.id, fields = %describe_fields(&errors), "Card details rejected");
                state.field_errors = errors.clone();
                return Err(CheckoutError::Validation(errors));
            }
            state.field_errors.clear();
        }

        let result = self.tokenizer.tokenize(&card).await;

        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::Acquire) != generation {
            warn!(session_id = %self.id, "Session closed during tokenization; discarding result");
            return Err(CheckoutError::InvalidStep { step: state.step, action: "submit card details" });
        }

        match result {
            Ok(token) => {
                state.context.set_token(token);
                self.transition(&mut state, CheckoutStep::Delivery);
                Ok(())
            }
            Err(error) => {
                state.last_error = Some(error.clone());
                Err(CheckoutError::Remote(error))
            }
        }
    }

    /// Validate delivery details and move on to the summary
    pub async fn submit_delivery(&self, info: DeliveryInfo) -> Result<(), CheckoutError> {
        if self.is_loading() {
            return Err(CheckoutError::Busy);
        }

        let mut state = self.state.lock().await;
        state.require_step(CheckoutStep::Delivery, "submit delivery details")?;
        state.last_error = None;

        let errors = validate_delivery(&info);
        state.delivery = Some(info);
        if !errors.is_empty() {
            debug!(session_id = %self.id, fields = %describe_fields(&errors), "Delivery details rejected");
            state.field_errors = errors.clone();
            return Err(CheckoutError::Validation(errors));
        }

        state.field_errors.clear();
        self.transition(&mut state, CheckoutStep::Summary);
        Ok(())
    }

    /// Place the order; a failure leaves the session on the summary
    ///
    /// Never retried here. Calling it again is a new submission.
    pub async fn confirm_order(&self) -> Result<OrderRecord, CheckoutError> {
        let _loading = LoadingGuard::acquire(&self.loading)?;
        let generation = self.generation.load(Ordering::Acquire);

        let request = {
            let mut state = self.state.lock().await;
            state.require_step(CheckoutStep::Summary, "confirm the order")?;
            let delivery = state.delivery.as_ref().ok_or(CheckoutError::InvalidStep {
                step: state.step,
                action: "confirm the order",
            })?;
            let request = OrderRequest::new(delivery, &state.context, &self.product, &self.summary);
            state.last_error = None;
            request
        };

        LoggingUtils::log_transition(&self.id, CheckoutStep::Summary.as_str(), CheckoutStep::Submitting.as_str());
        let result = self.gateway.submit_order(&request).await;

        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::Acquire) != generation {
            warn!(session_id = %self.id, "Session closed during order submission; discarding result");
            return Err(CheckoutError::InvalidStep { step: state.step, action: "confirm the order" });
        }

        match result {
            Ok(order) => {
                state.context.clear_token();
                state.order = Some(order.clone());
                self.transition(&mut state, CheckoutStep::Result);
                info!(session_id = %self.id, order_id = %order.order_id, status = %order.status, "Order placed");
                Ok(order)
            }
            Err(error) => {
                LoggingUtils::log_transition(&self.id, CheckoutStep::Submitting.as_str(), CheckoutStep::Summary.as_str());
                state.last_error = Some(error.clone());
                Err(CheckoutError::Remote(error))
            }
        }
    }

    /// Return to the previous step, keeping everything entered so far
    pub async fn back(&self) -> Result<CheckoutStep, CheckoutError> {
        if self.is_loading() {
            return Err(CheckoutError::Busy);
        }

        let mut state = self.state.lock().await;
        let previous = state.step.previous().ok_or(CheckoutError::InvalidStep {
            step: state.step,
            action: "go back",
        })?;

        state.last_error = None;
        state.field_errors.clear();
        self.transition(&mut state, previous);
        Ok(previous)
    }

    /// Tear the session down: the token and all entered data are discarded
    pub async fn close(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);

        let mut state = self.state.lock().await;
        let context = PaymentContext::new(
            state.context.device_id().map(str::to_string),
            state.context.session_id().map(str::to_string),
        );
        let from = state.step;
        *state = SessionState::new(context);

        LoggingUtils::log_transition(&self.id, from.as_str(), CheckoutStep::Card.as_str());
        info!(session_id = %self.id, "Checkout session closed");
    }

    /// Status poller for the placed order
    pub async fn status_poller(&self, countdown_ticks: u32) -> Result<StatusPoller, CheckoutError> {
        let state = self.state.lock().await;
        match (&state.step, &state.order) {
            (CheckoutStep::Result, Some(order)) => Ok(StatusPoller::new(
                Arc::clone(&self.gateway),
                order.clone(),
                countdown_ticks,
            )),
            _ => Err(CheckoutError::InvalidStep {
                step: self.visible_step(state.step),
                action: "follow the order status",
            }),
        }
    }
}
