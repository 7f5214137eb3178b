//! Completion and review engine.
//!
//! Completing a task records the poster's review and folds it into the
//! assigned provider's reputation. The task and the provider are committed
//! together through [`TaskRepository::commit_completion`], so a completed
//! task never coexists with stale provider statistics.

use super::lifecycle::{
    TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService, ensure_poster,
};
use crate::identity::{Actor, UserId};
use crate::notification::Notification;
use crate::reputation::{domain::Rating, ports::ProviderRepository};
use crate::task::{
    domain::{Task, TaskDomainError, TaskId, TaskReview, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use tracing::{error, info};

/// Request payload for completing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteTaskRequest {
    /// Star rating, validated to 1..=5.
    pub rating: i64,
    /// Review text, may be empty.
    pub comment: String,
    /// Whether the poster recommends the provider.
    pub recommend: bool,
}

impl CompleteTaskRequest {
    /// Creates a completion request.
    #[must_use]
    pub fn new(rating: i64, comment: impl Into<String>, recommend: bool) -> Self {
        Self {
            rating,
            comment: comment.into(),
            recommend,
        }
    }
}

impl<S, C> TaskLifecycleService<S, C>
where
    S: TaskRepository + ProviderRepository,
    C: Clock + Send + Sync,
{
    /// Completes an in-progress task with a review and re-ranks the assigned
    /// provider.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for a missing task,
    /// [`TaskLifecycleError::Forbidden`] unless the actor posted the task,
    /// [`TaskDomainError::AlreadyCompleted`] on a second completion, a
    /// validation error for an out-of-range rating, and
    /// [`TaskLifecycleError::InternalInconsistency`] when the assigned
    /// provider has no profile.
    pub async fn complete_task(
        &self,
        actor: &Actor,
        task_id: TaskId,
        request: CompleteTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        ensure_poster(actor, &task, "only the poster can complete this task")?;
        if task.status() == TaskStatus::Completed {
            return Err(TaskDomainError::AlreadyCompleted.into());
        }

        let CompleteTaskRequest {
            rating: stars,
            comment,
            recommend,
        } = request;
        let rating = Rating::new(stars)?;
        let review = TaskReview::new(rating, comment, recommend);
        let provider_id = task.complete(review, &*self.clock)?;

        let mut provider = self
            .store
            .find_provider(provider_id)
            .await?
            .ok_or_else(|| dangling_provider(task_id, provider_id))?;
        provider.record_review(rating, recommend, &*self.clock);

        self.store
            .commit_completion(&task, &provider)
            .await
            .map_err(|err| match err {
                TaskRepositoryError::ProviderNotFound(missing) => {
                    dangling_provider(task_id, missing)
                }
                other => other.into(),
            })?;

        let reputation = provider.reputation();
        info!(
            %task_id,
            provider = %provider_id,
            rating = rating.value(),
            average_rating = reputation.average_rating(),
            rank = %reputation.rank(),
            "task completed"
        );

        self.notifications
            .deliver_all([
                Notification::new(
                    task.poster(),
                    "Task completed",
                    format!("\"{}\" is complete and your review was recorded", task.title()),
                )
                .with_metadata("taskId", task_id),
                Notification::new(
                    provider_id,
                    "You received a review",
                    format!("\"{}\" was rated {rating}/5", task.title()),
                )
                .with_metadata("taskId", task_id)
                .with_metadata("rank", reputation.rank()),
            ])
            .await;
        Ok(task)
    }
}

fn dangling_provider(task: TaskId, provider: UserId) -> TaskLifecycleError {
    error!(
        task_id = %task,
        %provider,
        "assigned provider does not resolve to a profile; task data is inconsistent"
    );
    TaskLifecycleError::InternalInconsistency { task, provider }
}
