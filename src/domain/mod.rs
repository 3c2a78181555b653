//! Domain layer - Checkout data model and business rules
//!
//! This module contains the checkout data model, the validation rules and
//! the ports to external services. Nothing here performs I/O.

pub mod card;
pub mod catalog;
pub mod checkout;
pub mod delivery;
pub mod order;
pub mod ports;
pub mod session;
pub mod validation;

pub use card::{CardBrand, CreditCard};
pub use catalog::Product;
pub use checkout::CheckoutStep;
pub use delivery::DeliveryInfo;
pub use order::{FeeSchedule, LineItem, OrderRecord, OrderRequest, OrderStatus, PaymentData, PaymentSummary};
pub use ports::{CardTokenizer, OrderGateway, ProductCatalog, SessionInitializer};
pub use session::{PaymentContext, TokenReference, WidgetSession};
pub use validation::{validate_card, validate_card_at, validate_delivery, FieldError};
