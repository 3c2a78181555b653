//! Order domain models: totals, submission payload and order status

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::Product;
use crate::domain::delivery::DeliveryInfo;
use crate::domain::session::PaymentContext;
use crate::domain::validation::FieldError;

/// Order status reported by the storefront API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Paid,
    Failed,
    Completed,
    /// Anything the API reports that we do not know about.
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Failed => "FAILED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Other(raw) => raw,
        }
    }

    /// No further automatic status change is expected.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Completed | OrderStatus::Failed)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Completed)
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => OrderStatus::Pending,
            "PAID" => OrderStatus::Paid,
            "FAILED" => OrderStatus::Failed,
            "COMPLETED" => OrderStatus::Completed,
            _ => OrderStatus::Other(raw),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order as known to the client: its id and last observed status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(rename = "_id", alias = "id")]
    pub order_id: String,
    pub status: OrderStatus,
}

impl OrderRecord {
    pub fn new(order_id: impl Into<String>, status: OrderStatus) -> Self {
        Self {
            order_id: order_id.into(),
            status,
        }
    }
}

/// Fixed fees added on top of the goods subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub order_fee: Decimal,
    pub delivery_fee: Decimal,
}

/// Totals for one checkout; built only through [`PaymentSummary::compute`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    quantity: u32,
    unit_price: Decimal,
    subtotal: Decimal,
    order_fee: Decimal,
    delivery_fee: Decimal,
    total: Decimal,
}

impl PaymentSummary {
    /// Derive the totals for `quantity` units of `product`.
    pub fn compute(product: &Product, quantity: u32, fees: &FeeSchedule) -> Result<Self, FieldError> {
        if quantity == 0 {
            return Err(FieldError::new("quantity", "Quantity must be at least 1."));
        }
        if quantity > product.stock {
            return Err(FieldError::new(
                "quantity",
                format!("Only {} units are available.", product.stock),
            ));
        }

        let subtotal = product.price * Decimal::from(quantity);
        Ok(Self {
            quantity,
            unit_price: product.price,
            subtotal,
            order_fee: fees.order_fee,
            delivery_fee: fees.delivery_fee,
            total: subtotal + fees.order_fee + fees.delivery_fee,
        })
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn order_fee(&self) -> Decimal {
        self.order_fee
    }

    pub fn delivery_fee(&self) -> Decimal {
        self.delivery_fee
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Everything except delivery.
    pub fn goods_fee(&self) -> Decimal {
        self.total - self.delivery_fee
    }
}

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    pub quantity: u32,
    pub price_unit: Decimal,
    pub price_total: Decimal,
    pub name: String,
}

/// Payment identifiers forwarded to the order API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    // field name expected by the order API
    #[serde(rename = "sesionId", alias = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
}

/// Body of `POST /order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub delivery_info: DeliveryInfo,
    pub payment_data: PaymentData,
    pub products: Vec<LineItem>,
    pub fee_order: Decimal,
    pub fee_delivery: Decimal,
    pub fee_bought: Decimal,
}

impl OrderRequest {
    pub fn new(
        delivery: &DeliveryInfo,
        context: &PaymentContext,
        product: &Product,
        summary: &PaymentSummary,
    ) -> Self {
        Self {
            delivery_info: delivery.clone(),
            payment_data: context.payment_data(),
            products: vec![LineItem {
                product_id: product.id.clone(),
                quantity: summary.quantity(),
                price_unit: summary.unit_price(),
                price_total: summary.subtotal(),
                name: product.name.clone(),
            }],
            fee_order: summary.order_fee(),
            fee_delivery: summary.delivery_fee(),
            fee_bought: summary.goods_fee(),
        }
    }
}
