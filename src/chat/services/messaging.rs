//! Service layer for sending, listing, and acknowledging chat messages.

use crate::chat::{
    domain::{ChatDomainError, ChatMessage, ChatSummary},
    ports::{Broadcaster, MessageRepository, MessageRepositoryError},
};
use crate::identity::{Actor, UserId};
use crate::task::{
    domain::TaskId,
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Request payload for sending a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageRequest {
    /// User the message is addressed to.
    pub receiver: UserId,
    /// Message text; may be empty when an image is attached.
    pub text: String,
    /// URI of an already uploaded image.
    pub image_uri: Option<String>,
}

/// Service-level errors for chat operations.
#[derive(Debug, Error)]
pub enum ChatServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ChatDomainError),
    /// The task does not exist.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    /// Message repository operation failed.
    #[error(transparent)]
    Repository(#[from] MessageRepositoryError),
    /// Task lookup failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),
}

/// Result type for chat service operations.
pub type ChatServiceResult<T> = Result<T, ChatServiceError>;

/// Chat orchestration service.
pub struct ChatService<S, C>
where
    S: MessageRepository + TaskRepository,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    broadcaster: Arc<dyn Broadcaster>,
}

impl<S, C> ChatService<S, C>
where
    S: MessageRepository + TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new chat service around a shared broadcast handle.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>, broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self {
            store,
            clock,
            broadcaster,
        }
    }

    /// Persists a message and pushes it to the task's channel.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::TaskNotFound`] for an unknown task and
    /// domain errors for empty or self-addressed messages. Broadcast
    /// failures are logged and never returned.
    pub async fn send_message(
        &self,
        actor: &Actor,
        task_id: TaskId,
        request: SendMessageRequest,
    ) -> ChatServiceResult<ChatMessage> {
        self.ensure_task_exists(task_id).await?;
        let SendMessageRequest {
            receiver,
            text,
            image_uri,
        } = request;
        let message = ChatMessage::compose(
            task_id,
            actor.user_id(),
            receiver,
            text,
            image_uri,
            &*self.clock,
        )?;
        self.store.append_message(&message).await?;
        debug!(%task_id, message_id = %message.id(), "message stored");

        let channel = task_channel(task_id);
        let payload = json!({ "event": "receiveMessage", "message": &message });
        if let Err(err) = self.broadcaster.broadcast(&channel, payload).await {
            warn!(%channel, error = %err, "message broadcast failed");
        }
        Ok(message)
    }

    /// Lists a task's messages in send order.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::TaskNotFound`] for an unknown task.
    pub async fn list_messages(&self, task_id: TaskId) -> ChatServiceResult<Vec<ChatMessage>> {
        self.ensure_task_exists(task_id).await?;
        Ok(self.store.messages_for_task(task_id).await?)
    }

    /// Marks the task's messages addressed to the actor as read.
    ///
    /// Returns how many messages were newly marked.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::TaskNotFound`] for an unknown task.
    pub async fn mark_read(&self, actor: &Actor, task_id: TaskId) -> ChatServiceResult<u32> {
        self.ensure_task_exists(task_id).await?;
        let marked = self
            .store
            .mark_read(task_id, actor.user_id(), self.clock.utc())
            .await?;
        Ok(marked)
    }

    /// Summarises every conversation the actor took part in, most recently
    /// active first.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::Repository`] when the lookup fails.
    pub async fn chat_summary(&self, actor: &Actor) -> ChatServiceResult<Vec<ChatSummary>> {
        let user = actor.user_id();
        let messages = self.store.messages_for_user(user).await?;
        Ok(summarize(user, messages))
    }

    async fn ensure_task_exists(&self, task_id: TaskId) -> ChatServiceResult<()> {
        match self.store.find_by_id(task_id).await? {
            Some(_) => Ok(()),
            None => Err(ChatServiceError::TaskNotFound(task_id)),
        }
    }
}

/// Channel name carrying a task's chat traffic.
#[must_use]
pub fn task_channel(task_id: TaskId) -> String {
    format!("task:{task_id}")
}

/// Folds a user's messages, given in send order, into one summary per task.
fn summarize(user: UserId, messages: Vec<ChatMessage>) -> Vec<ChatSummary> {
    let mut by_task: HashMap<TaskId, ChatSummary> = HashMap::new();
    for message in messages {
        let unread = u32::from(message.is_unread_by(user));
        by_task
            .entry(message.task_id())
            .and_modify(|summary| {
                summary.unread_count = summary.unread_count.saturating_add(unread);
                summary.last_message = message.clone();
            })
            .or_insert_with(|| ChatSummary {
                task_id: message.task_id(),
                last_message: message.clone(),
                unread_count: unread,
            });
    }
    let mut summaries: Vec<ChatSummary> = by_task.into_values().collect();
    summaries.sort_by(|left, right| {
        right
            .last_message
            .sent_at()
            .cmp(&left.last_message.sent_at())
    });
    summaries
}
