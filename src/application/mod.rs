//! Application layer - Checkout orchestration
//!
//! This module contains the checkout session state machine and the order
//! status poller that follows a placed order.

pub mod checkout;
pub mod status_poller;

pub use checkout::{CheckoutError, CheckoutSession, CheckoutView};
pub use status_poller::{PollerHandle, ResultView, StatusPoller};
