//! Discussion threads embedded in a task.

use super::{CommentId, ReplyId, TaskDomainError};
use crate::identity::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Reply nested under exactly one comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    id: ReplyId,
    author: UserId,
    text: String,
    created_at: DateTime<Utc>,
}

impl Reply {
    /// Returns the reply identifier.
    #[must_use]
    pub const fn id(&self) -> ReplyId {
        self.id
    }

    /// Returns the reply author.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the reply text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns when the reply was posted.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Top-level comment on a task with its ordered replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    id: CommentId,
    author: UserId,
    text: String,
    created_at: DateTime<Utc>,
    replies: Vec<Reply>,
}

impl Comment {
    /// Creates a comment with no replies.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyCommentText`] for blank text.
    pub fn new(
        author: UserId,
        text: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        Ok(Self {
            id: CommentId::new(),
            author,
            text: normalize_text(text.into())?,
            created_at: clock.utc(),
            replies: Vec::new(),
        })
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the comment author.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the comment text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns when the comment was posted.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns replies in the order they were posted.
    #[must_use]
    pub fn replies(&self) -> &[Reply] {
        &self.replies
    }

    /// Finds a reply by identifier.
    #[must_use]
    pub fn find_reply(&self, id: ReplyId) -> Option<&Reply> {
        self.replies.iter().find(|reply| reply.id == id)
    }

    pub(super) fn push_reply(
        &mut self,
        author: UserId,
        text: String,
        clock: &impl Clock,
    ) -> Result<ReplyId, TaskDomainError> {
        let reply = Reply {
            id: ReplyId::new(),
            author,
            text: normalize_text(text)?,
            created_at: clock.utc(),
        };
        let id = reply.id;
        self.replies.push(reply);
        Ok(id)
    }
}

fn normalize_text(raw: String) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyCommentText);
    }
    Ok(trimmed.to_owned())
}
