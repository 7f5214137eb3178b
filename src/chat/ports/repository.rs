//! Repository port for chat message persistence.

use crate::chat::domain::{ChatMessage, MessageId};
use crate::identity::UserId;
use crate::task::domain::TaskId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for message repository operations.
pub type MessageRepositoryResult<T> = Result<T, MessageRepositoryError>;

/// Chat message persistence contract.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Appends a message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageRepositoryError::DuplicateMessage`] when the message
    /// ID already exists.
    async fn append_message(&self, message: &ChatMessage) -> MessageRepositoryResult<()>;

    /// Returns a task's messages ordered by send time, ties in insertion
    /// order.
    async fn messages_for_task(&self, task_id: TaskId)
    -> MessageRepositoryResult<Vec<ChatMessage>>;

    /// Returns every message the user sent or received, in the same order.
    async fn messages_for_user(&self, user: UserId) -> MessageRepositoryResult<Vec<ChatMessage>>;

    /// Stamps `read_at` on the task's unread messages addressed to `reader`.
    ///
    /// Returns the number of messages newly marked.
    async fn mark_read(
        &self,
        task_id: TaskId,
        reader: UserId,
        at: DateTime<Utc>,
    ) -> MessageRepositoryResult<u32>;
}

/// Errors returned by message repository implementations.
#[derive(Debug, Clone, Error)]
pub enum MessageRepositoryError {
    /// A message with the same identifier already exists.
    #[error("duplicate message identifier: {0}")]
    DuplicateMessage(MessageId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MessageRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
