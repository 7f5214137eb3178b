//! Port contract for outbound user notifications.

use crate::identity::UserId;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notifier operations.
pub type NotifierResult<T> = Result<T, NotifierError>;

/// Message addressed to a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    recipient: UserId,
    title: String,
    body: String,
    metadata: BTreeMap<String, String>,
}

impl Notification {
    /// Creates a notification without metadata.
    #[must_use]
    pub fn new(recipient: UserId, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            recipient,
            title: title.into(),
            body: body.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Attaches a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metadata.insert(key.into(), value.to_string());
        self
    }

    /// Returns the recipient.
    #[must_use]
    pub const fn recipient(&self) -> UserId {
        self.recipient
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the metadata entries.
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }
}

/// Delivery contract for push-style notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError`] when the delivery channel rejects or cannot
    /// reach the recipient.
    async fn notify(&self, notification: &Notification) -> NotifierResult<()>;
}

/// Errors returned by notifier adapters.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The recipient has no reachable delivery target.
    #[error("no delivery target for user {0}")]
    Unreachable(UserId),

    /// Transport-level failure.
    #[error("notification transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotifierError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
