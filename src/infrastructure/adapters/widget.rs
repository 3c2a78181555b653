//! Payment widget session initializer backed by configuration

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::SessionInitializer;
use crate::domain::session::WidgetSession;
use crate::shared::normalizer::NormalizedError;

/// Hands out the device/session identifiers the host obtained from the
/// payment widget before the checkout started.
pub struct ConfiguredSessionInitializer {
    session: WidgetSession,
}

impl ConfiguredSessionInitializer {
    pub fn new(session: WidgetSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SessionInitializer for ConfiguredSessionInitializer {
    async fn initialize(&self) -> Result<WidgetSession, NormalizedError> {
        info!(
            device_id = self.session.device_id.is_some(),
            session_id = self.session.session_id.is_some(),
            "Payment widget session initialized"
        );
        Ok(self.session.clone())
    }
}
