//! Bidding engine: providers offer a price and time estimate on active tasks.

use super::lifecycle::{TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService};
use crate::identity::{Actor, UserRole};
use crate::notification::Notification;
use crate::reputation::ports::ProviderRepository;
use crate::task::{
    domain::{Task, TaskId},
    ports::TaskRepository,
};
use mockable::Clock;
use tracing::info;

/// Request payload for placing a bid.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceBidRequest {
    /// Offered price.
    pub price: f64,
    /// Free-form time estimate such as "2 days".
    pub estimated_time: String,
    /// Optional note to the poster.
    pub comment: Option<String>,
}

impl PlaceBidRequest {
    /// Creates a bid request without a note.
    #[must_use]
    pub fn new(price: f64, estimated_time: impl Into<String>) -> Self {
        Self {
            price,
            estimated_time: estimated_time.into(),
            comment: None,
        }
    }

    /// Sets the note to the poster.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl<S, C> TaskLifecycleService<S, C>
where
    S: TaskRepository + ProviderRepository,
    C: Clock + Send + Sync,
{
    /// Places a bid on an active task and notifies the poster.
    ///
    /// Returns the updated task. A provider may bid more than once.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Forbidden`] unless the actor holds the
    /// provider role, [`TaskLifecycleError::TaskNotFound`] or
    /// [`TaskLifecycleError::ProviderNotFound`] for missing records, and
    /// domain errors when the task is not active or the bid is malformed.
    pub async fn place_bid(
        &self,
        actor: &Actor,
        task_id: TaskId,
        request: PlaceBidRequest,
    ) -> TaskLifecycleResult<Task> {
        if actor.role() != UserRole::Provider {
            return Err(TaskLifecycleError::Forbidden("only providers can bid on tasks"));
        }
        let mut task = self.load(task_id).await?;
        let provider = self
            .store
            .find_provider(actor.user_id())
            .await?
            .ok_or(TaskLifecycleError::ProviderNotFound(actor.user_id()))?;

        let PlaceBidRequest {
            price,
            estimated_time,
            comment,
        } = request;
        let bid_id = task.place_bid(provider.id(), price, estimated_time, comment, &*self.clock)?;
        self.store.update(&task).await?;
        info!(%task_id, %bid_id, provider = %provider.id(), "bid placed");

        self.notifications
            .deliver(
                Notification::new(
                    task.poster(),
                    "New bid on your task",
                    format!(
                        "{} offered {price} for \"{}\"",
                        provider.display_name(),
                        task.title()
                    ),
                )
                .with_metadata("taskId", task_id)
                .with_metadata("bidId", bid_id),
            )
            .await;
        Ok(task)
    }
}
