//! Assignment engine: the poster accepts exactly one bid.

use super::lifecycle::{TaskLifecycleResult, TaskLifecycleService, ensure_poster};
use crate::identity::Actor;
use crate::notification::Notification;
use crate::reputation::ports::ProviderRepository;
use crate::task::{
    domain::{BidId, Task, TaskId},
    ports::TaskRepository,
};
use mockable::Clock;
use tracing::info;

impl<S, C> TaskLifecycleService<S, C>
where
    S: TaskRepository + ProviderRepository,
    C: Clock + Send + Sync,
{
    /// Accepts a bid, assigning its provider and moving the task to
    /// `InProgress`.
    ///
    /// Administrators get no override here. Once a bid has been accepted,
    /// further acceptances are rejected rather than overwriting the
    /// assignment.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskLifecycleError::TaskNotFound`] for a missing
    /// task, [`super::TaskLifecycleError::Forbidden`] unless the actor posted
    /// the task, and domain errors when the bid is not on the task or the
    /// task is not active. Concurrent acceptances surface as a repository
    /// conflict for every caller but one.
    pub async fn accept_bid(
        &self,
        actor: &Actor,
        task_id: TaskId,
        bid_id: BidId,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        ensure_poster(actor, &task, "only the poster can accept bids")?;
        let provider = task.accept_bid(bid_id, &*self.clock)?;
        self.store.update(&task).await?;
        info!(%task_id, %bid_id, %provider, "bid accepted");

        self.notifications
            .deliver(
                Notification::new(
                    provider,
                    "Your bid was accepted",
                    format!("You have been assigned \"{}\"", task.title()),
                )
                .with_metadata("taskId", task_id)
                .with_metadata("bidId", bid_id),
            )
            .await;
        Ok(task)
    }
}
