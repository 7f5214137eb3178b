//! Port contract for realtime broadcast to connected clients.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for broadcast operations.
pub type BroadcastResult<T> = Result<T, BroadcastError>;

/// Pushes payloads to every subscriber of a named channel.
///
/// Delivery is best-effort: a channel without subscribers is not an error.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Publishes `payload` on `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`BroadcastError`] when the transport fails.
    async fn broadcast(&self, channel: &str, payload: Value) -> BroadcastResult<()>;
}

/// Errors returned by broadcaster adapters.
#[derive(Debug, Clone, Error)]
pub enum BroadcastError {
    /// The transport failed.
    #[error("broadcast transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl BroadcastError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
