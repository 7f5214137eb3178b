//! In-process broadcast hub backed by `tokio::sync::broadcast` channels.

use crate::chat::ports::{BroadcastError, BroadcastResult, Broadcaster};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tracing::trace;

const DEFAULT_CAPACITY: usize = 64;

type Registry = HashMap<String, broadcast::Sender<Value>>;

/// Named broadcast channels shared by every request.
///
/// Channels are created on first subscription. A channel whose subscribers
/// have all gone is dropped on its next broadcast or on the next
/// subscription to any channel.
#[derive(Debug, Clone)]
pub struct BroadcastHub {
    channels: Arc<Mutex<Registry>>,
    capacity: usize,
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastHub {
    /// Creates a hub with the default per-channel buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a hub buffering up to `capacity` payloads per channel.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Subscribes to a channel, creating it when needed.
    ///
    /// # Errors
    ///
    /// Returns [`BroadcastError`] when the channel registry lock is poisoned.
    pub fn subscribe(&self, channel: &str) -> BroadcastResult<broadcast::Receiver<Value>> {
        let mut channels = self.registry()?;
        channels.retain(|name, sender| name == channel || sender.receiver_count() > 0);
        let sender = channels
            .entry(channel.to_owned())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        Ok(sender.subscribe())
    }

    #[cfg(test)]
    pub(crate) fn channel_count(&self) -> usize {
        self.registry().map_or(0, |channels| channels.len())
    }

    fn registry(&self) -> BroadcastResult<MutexGuard<'_, Registry>> {
        self.channels
            .lock()
            .map_err(|err| BroadcastError::transport(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl Broadcaster for BroadcastHub {
    async fn broadcast(&self, channel: &str, payload: Value) -> BroadcastResult<()> {
        let mut channels = self.registry()?;
        let Some(sender) = channels.get(channel) else {
            trace!(channel, "no subscribers; payload dropped");
            return Ok(());
        };
        if sender.send(payload).is_err() {
            channels.remove(channel);
            trace!(channel, "last subscriber left; channel removed");
        }
        Ok(())
    }
}
