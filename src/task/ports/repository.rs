//! Repository port for task persistence and the completion unit of work.

use crate::identity::UserId;
use crate::reputation::domain::Provider;
use crate::task::domain::{Task, TaskCategory, TaskId, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Optional criteria for listing tasks. Empty criteria match every task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks in this status.
    pub status: Option<TaskStatus>,
    /// Only tasks in this category.
    pub category: Option<TaskCategory>,
    /// Only tasks posted by this user.
    pub poster: Option<UserId>,
}

impl TaskFilter {
    /// Returns `true` when the task satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|status| task.status() == status)
            && self.category.is_none_or(|category| task.category() == category)
            && self.poster.is_none_or(|poster| task.poster() == poster)
    }
}

/// Task persistence contract.
///
/// Writes are compare-and-swap on [`Task::version`]: an update succeeds only
/// when the stored version is exactly one behind the supplied task, so two
/// requests that read the same version cannot both win.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// or [`TaskRepositoryError::Conflict`] when it changed since it was read.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists tasks matching the filter, newest first.
    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>>;

    /// Atomically persists a completed task together with the assigned
    /// provider's updated reputation.
    ///
    /// Either both documents are written or neither is. Each write is
    /// version-checked like [`TaskRepository::update`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] or
    /// [`TaskRepositoryError::ProviderNotFound`] when a document is missing,
    /// and [`TaskRepositoryError::Conflict`] or
    /// [`TaskRepositoryError::ProviderConflict`] when either moved.
    async fn commit_completion(&self, task: &Task, provider: &Provider)
    -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored task version moved since it was read.
    #[error("task {0} was modified concurrently")]
    Conflict(TaskId),

    /// The provider written alongside a completion was not found.
    #[error("provider not found: {0}")]
    ProviderNotFound(UserId),

    /// The provider written alongside a completion moved since it was read.
    #[error("provider {0} was modified concurrently")]
    ProviderConflict(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
