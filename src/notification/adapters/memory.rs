//! In-memory notifier for tests.

use crate::notification::{Notification, Notifier, NotifierError, NotifierResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Thread-safe notifier that records every delivery.
///
/// Calling [`RecordingNotifier::fail_deliveries`] makes subsequent deliveries
/// fail without being recorded.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    delivered: Arc<Mutex<Vec<Notification>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingNotifier {
    /// Creates an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following delivery fail.
    pub fn fail_deliveries(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Returns a snapshot of delivered notifications in delivery order.
    #[must_use]
    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered
            .lock()
            .map(|delivered| delivered.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> NotifierResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifierError::Unreachable(notification.recipient()));
        }
        self.delivered
            .lock()
            .map_err(|err| NotifierError::transport(std::io::Error::other(err.to_string())))?
            .push(notification.clone());
        Ok(())
    }
}
