//! Best-effort delivery wrapper shared by the services.

use super::{Notification, Notifier};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Whether delivery runs inside the calling request or on its own task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// The caller waits for delivery, bounded by the timeout.
    Awaited,
    /// Delivery is spawned onto the runtime and the caller returns at once.
    Detached,
}

/// Handle that delivers notifications without ever failing the caller.
///
/// Built once at startup and shared by every service.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
    timeout: Duration,
    mode: DeliveryMode,
}

impl NotificationDispatcher {
    /// Creates a dispatcher whose callers wait for each delivery, giving it
    /// at most `timeout`.
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>, timeout: Duration) -> Self {
        Self {
            notifier,
            timeout,
            mode: DeliveryMode::Awaited,
        }
    }

    /// Creates a dispatcher that delivers on a spawned task so responses
    /// never wait on the notifier.
    ///
    /// Must be used from within a Tokio runtime.
    #[must_use]
    pub fn detached(notifier: Arc<dyn Notifier>, timeout: Duration) -> Self {
        Self {
            notifier,
            timeout,
            mode: DeliveryMode::Detached,
        }
    }

    /// Returns how deliveries are scheduled.
    #[must_use]
    pub const fn mode(&self) -> DeliveryMode {
        self.mode
    }

    /// Delivers a notification, logging and swallowing any failure.
    pub async fn deliver(&self, notification: Notification) {
        self.deliver_all([notification]).await;
    }

    /// Delivers several notifications in order.
    pub async fn deliver_all(&self, notifications: impl IntoIterator<Item = Notification>) {
        match self.mode {
            DeliveryMode::Awaited => {
                for notification in notifications {
                    self.send(notification).await;
                }
            }
            DeliveryMode::Detached => {
                let batch: Vec<Notification> = notifications.into_iter().collect();
                let dispatcher = self.clone();
                tokio::spawn(async move {
                    for notification in batch {
                        dispatcher.send(notification).await;
                    }
                });
            }
        }
    }

    async fn send(&self, notification: Notification) {
        let recipient = notification.recipient();
        match tokio::time::timeout(self.timeout, self.notifier.notify(&notification)).await {
            Ok(Ok(())) => {
                debug!(%recipient, title = notification.title(), "notification delivered");
            }
            Ok(Err(err)) => warn!(%recipient, error = %err, "notification delivery failed"),
            Err(_) => warn!(
                %recipient,
                timeout_ms = self.timeout.as_millis(),
                "notification delivery timed out"
            ),
        }
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("timeout", &self.timeout)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
