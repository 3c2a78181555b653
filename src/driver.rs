//! Command-line checkout driver
//!
//! Runs one purchase end to end from an order file: widget session, product
//! lookup, card, delivery, confirmation, then follows the order status until
//! the poller settles.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;

use crate::application::{CheckoutError, CheckoutSession, ResultView};
use crate::config::AppConfig;
use crate::domain::card::CreditCard;
use crate::domain::delivery::DeliveryInfo;
use crate::domain::ports::{ProductCatalog, SessionInitializer};
use crate::infrastructure::{ConfiguredSessionInitializer, StorefrontApiClient, TokenizationClient};

/// What to buy and how to pay for it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFile {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub card: CreditCard,
    pub delivery: DeliveryInfo,
}

fn default_quantity() -> u32 {
    1
}

impl OrderFile {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read order file {}", path.display()))?;
        serde_json::from_str(&raw).context("Invalid order file")
    }
}

/// Process exit code for a finished run: 0 only when the order succeeded
pub fn exit_code(outcome: &anyhow::Result<ResultView>) -> i32 {
    match outcome {
        Ok(view) if view.is_success() => 0,
        _ => 1,
    }
}

/// Run a checkout for the order file at `order_path` and return the final view
pub async fn run(order_path: &Path, config: &AppConfig) -> anyhow::Result<ResultView> {
    let order = OrderFile::read(order_path)?;

    let tokenizer = Arc::new(TokenizationClient::new(&config.tokenization)?);
    let api = Arc::new(StorefrontApiClient::new(&config.api)?);

    let widget = ConfiguredSessionInitializer::new(config.widget_session())
        .initialize()
        .await
        .context("Payment widget initialization failed")?;

    let product = api
        .get_product(&order.product_id)
        .await
        .with_context(|| format!("Failed to load product {}", order.product_id))?;

    let session = CheckoutSession::start(
        product,
        order.quantity,
        &config.fee_schedule(),
        widget.into(),
        tokenizer,
        api,
    )
    .map_err(explain)?;

    let summary = session.summary();
    println!(
        "{} x{}: subtotal {}, delivery {}, total {}",
        session.product().name,
        summary.quantity(),
        summary.subtotal(),
        summary.delivery_fee(),
        summary.total()
    );

    session
        .submit_card(order.card)
        .await
        .map_err(explain)
        .context("Card step failed")?;
    session
        .submit_delivery(order.delivery)
        .await
        .map_err(explain)
        .context("Delivery step failed")?;

    let placed = session.confirm_order().await.map_err(explain)?;
    println!("Order {} placed ({})", placed.order_id, placed.status);

    let mut handle = session
        .status_poller(config.checkout.countdown_ticks)
        .await
        .map_err(explain)?
        .spawn(config.tick_interval());

    println!("{}", handle.view());
    while let Some(view) = handle.changed().await {
        println!("{}", view);
    }

    let view = handle.view();
    session.close().await;
    Ok(view)
}

/// Spell out every rejected field instead of just their names
fn explain(err: CheckoutError) -> anyhow::Error {
    match err {
        CheckoutError::Validation(errors) => {
            let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
            anyhow::anyhow!("Invalid input:\n  {}", lines.join("\n  "))
        }
        other => other.into(),
    }
}
