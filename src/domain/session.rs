//! Session-scoped payment identifiers

use serde::{Deserialize, Serialize};

use crate::domain::order::PaymentData;

/// Opaque card token issued by the tokenization service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenReference(String);

impl TokenReference {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiers produced by the payment widget when the host initializes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSession {
    pub device_id: Option<String>,
    pub session_id: Option<String>,
}

/// Payment identifiers for one checkout session.
///
/// Created when the session starts and dropped with it; the card token is
/// set by a successful tokenization and cleared when the session closes or
/// an order is placed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentContext {
    device_id: Option<String>,
    session_id: Option<String>,
    token: Option<TokenReference>,
}

impl PaymentContext {
    pub fn new(device_id: Option<String>, session_id: Option<String>) -> Self {
        Self {
            device_id,
            session_id,
            token: None,
        }
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn token(&self) -> Option<&TokenReference> {
        self.token.as_ref()
    }

    pub fn set_token(&mut self, token: TokenReference) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) -> Option<TokenReference> {
        self.token.take()
    }

    pub fn payment_data(&self) -> PaymentData {
        PaymentData {
            device_id: self.device_id.clone(),
            session_id: self.session_id.clone(),
            token_id: self.token.as_ref().map(|t| t.as_str().to_string()),
        }
    }
}

impl From<WidgetSession> for PaymentContext {
    fn from(session: WidgetSession) -> Self {
        Self::new(session.device_id, session.session_id)
    }
}
