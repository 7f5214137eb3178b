//! Comments and replies on tasks.

use super::lifecycle::{TaskLifecycleResult, TaskLifecycleService};
use crate::identity::Actor;
use crate::notification::Notification;
use crate::reputation::ports::ProviderRepository;
use crate::task::{
    domain::{Comment, CommentId, Task, TaskDomainError, TaskId},
    ports::TaskRepository,
};
use mockable::Clock;
use tracing::debug;

impl<S, C> TaskLifecycleService<S, C>
where
    S: TaskRepository + ProviderRepository,
    C: Clock + Send + Sync,
{
    /// Adds a comment to a task. The poster is notified unless they wrote it.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskLifecycleError::TaskNotFound`] for a missing task
    /// and a domain error for blank text.
    pub async fn add_comment(
        &self,
        actor: &Actor,
        task_id: TaskId,
        text: impl Into<String> + Send,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        let author = actor.user_id();
        let comment_id = task.add_comment(author, text, &*self.clock)?;
        self.store.update(&task).await?;
        debug!(%task_id, %comment_id, %author, "comment added");

        if !task.is_posted_by(author) {
            self.notifications
                .deliver(
                    Notification::new(
                        task.poster(),
                        "New comment on your task",
                        format!("Someone commented on \"{}\"", task.title()),
                    )
                    .with_metadata("taskId", task_id)
                    .with_metadata("commentId", comment_id),
                )
                .await;
        }
        Ok(task)
    }

    /// Replies to a comment. The original commenter is notified unless they
    /// wrote the reply.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskLifecycleError::TaskNotFound`] for a missing
    /// task, [`TaskDomainError::CommentNotFound`] for a missing comment, and
    /// a domain error for blank text.
    pub async fn add_reply(
        &self,
        actor: &Actor,
        task_id: TaskId,
        comment_id: CommentId,
        text: impl Into<String> + Send,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        let author = actor.user_id();
        let commenter = task
            .find_comment(comment_id)
            .map(Comment::author)
            .ok_or(TaskDomainError::CommentNotFound(comment_id))?;
        let reply_id = task.add_reply(comment_id, author, text, &*self.clock)?;
        self.store.update(&task).await?;
        debug!(%task_id, %comment_id, %reply_id, %author, "reply added");

        if commenter != author {
            self.notifications
                .deliver(
                    Notification::new(
                        commenter,
                        "New reply to your comment",
                        format!("Someone replied to your comment on \"{}\"", task.title()),
                    )
                    .with_metadata("taskId", task_id)
                    .with_metadata("commentId", comment_id)
                    .with_metadata("replyId", reply_id),
                )
                .await;
        }
        Ok(task)
    }
}
