//! Order status polling
//!
//! [`StatusPoller`] is a plain state machine advanced one tick at a time.
//! [`StatusPoller::spawn`] puts it on a tokio interval owned by a single
//! task; the returned [`PollerHandle`] aborts that task on cancel or drop.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::domain::order::{OrderRecord, OrderStatus};
use crate::domain::ports::OrderGateway;

/// What the result step shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum ResultView {
    /// Order paid or completed. Nothing left to poll.
    Success { order_id: String },
    /// Order failed; redirect to the catalog after the countdown.
    Failure { order_id: String, redirect_in: u32 },
    /// Waiting on payment; the status is fetched again after the countdown.
    Pending { order_id: String, refresh_in: u32 },
    /// Status we do not recognize; shown as-is, then redirect.
    Processing {
        order_id: String,
        status: String,
        redirect_in: u32,
    },
    /// Countdown elapsed on a failed or unknown order.
    Redirect,
}

impl ResultView {
    pub fn is_success(&self) -> bool {
        matches!(self, ResultView::Success { .. })
    }
}

impl std::fmt::Display for ResultView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultView::Success { order_id } => write!(f, "Payment successful. Order {}", order_id),
            ResultView::Failure { order_id, redirect_in } => write!(
                f,
                "Payment failed for order {}. Returning to the catalog in {}s",
                order_id, redirect_in
            ),
            ResultView::Pending { order_id, refresh_in } => write!(
                f,
                "Order {} is pending. Checking again in {}s",
                order_id, refresh_in
            ),
            ResultView::Processing { order_id, status, redirect_in } => write!(
                f,
                "Order {} is {}. Returning to the catalog in {}s",
                order_id, status, redirect_in
            ),
            ResultView::Redirect => f.write_str("Returning to the catalog"),
        }
    }
}

pub struct StatusPoller {
    gateway: Arc<dyn OrderGateway>,
    order: OrderRecord,
    countdown_ticks: u32,
    remaining: u32,
    redirected: bool,
    fetches: u32,
}

impl StatusPoller {
    pub fn new(gateway: Arc<dyn OrderGateway>, order: OrderRecord, countdown_ticks: u32) -> Self {
        let countdown_ticks = countdown_ticks.max(1);
        Self {
            gateway,
            order,
            countdown_ticks,
            remaining: countdown_ticks,
            redirected: false,
            fetches: 0,
        }
    }

    pub fn order(&self) -> &OrderRecord {
        &self.order
    }

    /// Ticks left before the next refresh or the redirect
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Status fetches issued so far
    pub fn fetch_count(&self) -> u32 {
        self.fetches
    }

    /// False once the order succeeded or the redirect was emitted
    pub fn is_active(&self) -> bool {
        !self.redirected && !self.order.status.is_success()
    }

    pub fn view(&self) -> ResultView {
        if self.redirected {
            return ResultView::Redirect;
        }

        let order_id = self.order.order_id.clone();
        match &self.order.status {
            OrderStatus::Paid | OrderStatus::Completed => ResultView::Success { order_id },
            OrderStatus::Pending => ResultView::Pending {
                order_id,
                refresh_in: self.remaining,
            },
            OrderStatus::Failed => ResultView::Failure {
                order_id,
                redirect_in: self.remaining,
            },
            OrderStatus::Other(status) => ResultView::Processing {
                order_id,
                status: status.clone(),
                redirect_in: self.remaining,
            },
        }
    }

    /// Advance the countdown by one tick
    pub async fn tick(&mut self) -> ResultView {
        if !self.is_active() {
            return self.view();
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return self.view();
        }

        if self.order.status == OrderStatus::Pending {
            self.refresh().await;
            self.remaining = self.countdown_ticks;
        } else {
            info!(order_id = %self.order.order_id, status = %self.order.status, "Redirecting to the catalog");
            self.redirected = true;
        }

        self.view()
    }

    async fn refresh(&mut self) {
        self.fetches += 1;
        match self.gateway.fetch_order(&self.order.order_id).await {
            Ok(record) => {
                if record.status != self.order.status {
                    info!(
                        order_id = %self.order.order_id,
                        from = %self.order.status,
                        to = %record.status,
                        "Order status changed"
                    );
                }
                self.order.status = record.status;
            }
            Err(error) => {
                warn!(
                    order_id = %self.order.order_id,
                    code = %error.code,
                    "Order status refresh failed; keeping the last known status"
                );
            }
        }
    }

    /// Drive the poller on a `tick`-long interval until it goes inactive
    pub fn spawn(self, tick: Duration) -> PollerHandle {
        let (sender, receiver) = watch::channel(self.view());

        let task = tokio::spawn(async move {
            let mut poller = self;
            let mut interval = tokio::time::interval(tick.max(Duration::from_millis(1)));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick completes immediately
            interval.tick().await;

            while poller.is_active() {
                interval.tick().await;
                let view = poller.tick().await;
                if sender.send(view).is_err() {
                    break;
                }
            }

            debug!(
                order_id = %poller.order.order_id,
                fetches = poller.fetches,
                "Status poller stopped"
            );
        });

        PollerHandle {
            view: receiver,
            task: Some(task),
        }
    }
}

/// Owner of a running poller task
pub struct PollerHandle {
    view: watch::Receiver<ResultView>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Latest published view
    pub fn view(&self) -> ResultView {
        self.view.borrow().clone()
    }

    /// Wait for the next view; `None` once the poller has stopped
    pub async fn changed(&mut self) -> Option<ResultView> {
        self.view.changed().await.ok()?;
        Some(self.view.borrow_and_update().clone())
    }

    /// Stop the timer now
    pub fn cancel(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the task to end, either by itself or after [`cancel`](Self::cancel)
    pub async fn finished(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
