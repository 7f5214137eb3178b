//! Chat message entity and per-conversation summary.

use super::ChatDomainError;
use crate::identity::UserId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random message identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a message identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direct message exchanged between two users about a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    id: MessageId,
    task_id: TaskId,
    sender: UserId,
    receiver: UserId,
    text: String,
    image_uri: Option<String>,
    sent_at: DateTime<Utc>,
    read_at: Option<DateTime<Utc>>,
}

impl ChatMessage {
    /// Composes an unread message.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::SelfAddressed`] when sender and receiver
    /// match, and [`ChatDomainError::EmptyMessage`] when both the text and
    /// the image are blank.
    pub fn compose(
        task_id: TaskId,
        sender: UserId,
        receiver: UserId,
        text: impl Into<String>,
        image_uri: Option<String>,
        clock: &impl Clock,
    ) -> Result<Self, ChatDomainError> {
        if sender == receiver {
            return Err(ChatDomainError::SelfAddressed);
        }
        let body = text.into().trim().to_owned();
        let image = image_uri
            .map(|uri| uri.trim().to_owned())
            .filter(|uri| !uri.is_empty());
        if body.is_empty() && image.is_none() {
            return Err(ChatDomainError::EmptyMessage);
        }

        Ok(Self {
            id: MessageId::new(),
            task_id,
            sender,
            receiver,
            text: body,
            image_uri: image,
            sent_at: clock.utc(),
            read_at: None,
        })
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the task the conversation is about.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the sender.
    #[must_use]
    pub const fn sender(&self) -> UserId {
        self.sender
    }

    /// Returns the receiver.
    #[must_use]
    pub const fn receiver(&self) -> UserId {
        self.receiver
    }

    /// Returns the message text, possibly empty for image-only messages.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the attached image URI, if any.
    #[must_use]
    pub fn image_uri(&self) -> Option<&str> {
        self.image_uri.as_deref()
    }

    /// Returns when the message was sent.
    #[must_use]
    pub const fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }

    /// Returns when the receiver read the message.
    #[must_use]
    pub const fn read_at(&self) -> Option<DateTime<Utc>> {
        self.read_at
    }

    /// Returns `true` when `user` sent or received the message.
    #[must_use]
    pub fn involves(&self, user: UserId) -> bool {
        self.sender == user || self.receiver == user
    }

    /// Returns `true` when the message is addressed to `user` and unread.
    #[must_use]
    pub fn is_unread_by(&self, user: UserId) -> bool {
        self.receiver == user && self.read_at.is_none()
    }

    /// Stamps the read receipt if the message is still unread.
    ///
    /// Returns `true` when the receipt was newly set.
    pub fn mark_read(&mut self, at: DateTime<Utc>) -> bool {
        if self.read_at.is_some() {
            return false;
        }
        self.read_at = Some(at);
        true
    }
}

/// Latest activity in one task conversation, from one user's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    /// Task the conversation is about.
    pub task_id: TaskId,
    /// Most recent message in the conversation.
    pub last_message: ChatMessage,
    /// Messages addressed to the user that are still unread.
    pub unread_count: u32,
}
