//! Service layer for posting, reading, editing, cancelling, and deleting
//! tasks, plus the shared service type the engines extend.

use crate::identity::{Actor, UserId, UserRole};
use crate::notification::NotificationDispatcher;
use crate::reputation::{
    domain::ReputationDomainError,
    ports::{ProviderRepository, ProviderRepositoryError},
};
use crate::task::{
    domain::{
        NewTask, Task, TaskCategory, TaskDomainError, TaskEdit, TaskId, TaskLocation, TaskStatus,
    },
    ports::{TaskFilter, TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for posting a task. The poster is the acting user.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTaskRequest {
    /// Short summary.
    pub title: String,
    /// Full description of the work.
    pub description: String,
    /// Kind of work.
    pub category: TaskCategory,
    /// Budget offered.
    pub budget: f64,
    /// Optional completion deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Where the work happens.
    pub location: TaskLocation,
    /// Image URIs already uploaded to storage.
    pub images: Vec<String>,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or a lifecycle rule failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Review rating validation failed.
    #[error(transparent)]
    Review(#[from] ReputationDomainError),
    /// The task does not exist.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    /// The acting provider has no profile.
    #[error("provider {0} not found")]
    ProviderNotFound(UserId),
    /// The actor lacks the required role or relationship to the task.
    #[error("{0}")]
    Forbidden(&'static str),
    /// Only cancellation may be requested through a status change.
    #[error("status {0} cannot be requested directly")]
    UnsupportedStatusChange(TaskStatus),
    /// The assigned provider on a task has no profile.
    #[error("task {task} is assigned to provider {provider}, which does not exist")]
    InternalInconsistency {
        /// Task being completed.
        task: TaskId,
        /// Dangling provider reference.
        provider: UserId,
    },
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Provider repository operation failed.
    #[error(transparent)]
    ProviderRepository(#[from] ProviderRepositoryError),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Hosts the task store operations together with the bidding, assignment,
/// completion, and discussion engines. Notifications are delivered after the
/// corresponding write has committed.
pub struct TaskLifecycleService<S, C>
where
    S: TaskRepository + ProviderRepository,
    C: Clock + Send + Sync,
{
    pub(super) store: Arc<S>,
    pub(super) clock: Arc<C>,
    pub(super) notifications: NotificationDispatcher,
}

impl<S, C> TaskLifecycleService<S, C>
where
    S: TaskRepository + ProviderRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>, notifications: NotificationDispatcher) -> Self {
        Self {
            store,
            clock,
            notifications,
        }
    }

    /// Posts a new active task on behalf of the actor.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Forbidden`] unless the actor holds the
    /// user role, domain errors for invalid details, or repository errors.
    pub async fn create_task(
        &self,
        actor: &Actor,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        if actor.role() != UserRole::User {
            return Err(TaskLifecycleError::Forbidden("only users can post tasks"));
        }
        let CreateTaskRequest {
            title,
            description,
            category,
            budget,
            deadline,
            location,
            images,
        } = request;
        let task = Task::create(
            NewTask {
                poster: actor.user_id(),
                title,
                description,
                category,
                budget,
                deadline,
                location,
                images,
            },
            &*self.clock,
        )?;
        self.store.store(&task).await?;
        info!(task_id = %task.id(), poster = %task.poster(), "task posted");
        Ok(task)
    }

    /// Retrieves a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist.
    pub async fn get_task(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.load(id).await
    }

    /// Lists tasks matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_tasks(&self, filter: TaskFilter) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.store.list(&filter).await?)
    }

    /// Edits the details of an active task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Forbidden`] unless the actor posted the
    /// task, and domain errors when the task is no longer editable or the
    /// edit touches details frozen by existing bids.
    pub async fn edit_task(
        &self,
        actor: &Actor,
        id: TaskId,
        edit: TaskEdit,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(id).await?;
        ensure_poster(actor, &task, "only the poster can edit this task")?;
        task.edit(edit, &*self.clock)?;
        self.store.update(&task).await?;
        Ok(task)
    }

    /// Applies a requested status change. Only cancellation is accepted;
    /// the other transitions belong to the bidding engines.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Forbidden`] unless the actor posted the
    /// task or is an administrator,
    /// [`TaskLifecycleError::UnsupportedStatusChange`] for any status other
    /// than `Cancelled`, and a domain error when the task is already
    /// terminal.
    pub async fn change_status(
        &self,
        actor: &Actor,
        id: TaskId,
        status: TaskStatus,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(id).await?;
        ensure_poster_or_admin(
            actor,
            &task,
            "only the poster or an admin can change status",
        )?;
        if status != TaskStatus::Cancelled {
            return Err(TaskLifecycleError::UnsupportedStatusChange(status));
        }
        task.cancel(&*self.clock)?;
        self.store.update(&task).await?;
        info!(task_id = %id, actor = %actor.user_id(), "task cancelled");
        Ok(task)
    }

    /// Deletes a task that has not been completed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Forbidden`] unless the actor posted the
    /// task or is an administrator, and a domain error for completed tasks.
    pub async fn delete_task(&self, actor: &Actor, id: TaskId) -> TaskLifecycleResult<()> {
        let task = self.load(id).await?;
        ensure_poster_or_admin(
            actor,
            &task,
            "only the poster or an admin can delete this task",
        )?;
        task.ensure_deletable()?;
        self.store.delete(id).await?;
        info!(task_id = %id, actor = %actor.user_id(), "task deleted");
        Ok(())
    }

    pub(super) async fn load(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(id))
    }
}

pub(super) fn ensure_poster(
    actor: &Actor,
    task: &Task,
    reason: &'static str,
) -> TaskLifecycleResult<()> {
    if task.is_posted_by(actor.user_id()) {
        Ok(())
    } else {
        Err(TaskLifecycleError::Forbidden(reason))
    }
}

fn ensure_poster_or_admin(
    actor: &Actor,
    task: &Task,
    reason: &'static str,
) -> TaskLifecycleResult<()> {
    if actor.is_admin() {
        return Ok(());
    }
    ensure_poster(actor, task, reason)
}
