//! Notifier that records deliveries in the structured log.

use crate::notification::{Notification, Notifier, NotifierResult};
use async_trait::async_trait;
use tracing::info;

/// Default production notifier until a push gateway is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, notification: &Notification) -> NotifierResult<()> {
        info!(
            recipient = %notification.recipient(),
            title = notification.title(),
            body = notification.body(),
            metadata = ?notification.metadata(),
            "notification"
        );
        Ok(())
    }
}
