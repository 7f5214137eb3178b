//! Shared world state for task marketplace BDD scenarios.

use std::sync::Arc;
use std::time::Duration;

use rstest::fixture;
use taskmarket::api::AppState;
use taskmarket::chat::adapters::BroadcastHub;
use taskmarket::identity::{Actor, UserId, UserRole};
use taskmarket::notification::adapters::RecordingNotifier;
use taskmarket::storage::InMemoryMarketplaceStore;
use taskmarket::task::{
    domain::{BidId, Task},
    services::TaskLifecycleError,
};

/// Scenario world for marketplace behaviour tests.
pub struct MarketplaceWorld {
    pub state: AppState<InMemoryMarketplaceStore>,
    pub poster: Actor,
    pub provider: Actor,
    pub rival: Actor,
    pub task: Option<Task>,
    pub provider_bid: Option<BidId>,
    pub rival_bid: Option<BidId>,
    pub last_result: Option<Result<Task, TaskLifecycleError>>,
}

impl MarketplaceWorld {
    /// Creates a world with a fresh in-memory marketplace.
    #[must_use]
    pub fn new() -> Self {
        let state = AppState::new(
            Arc::new(InMemoryMarketplaceStore::new()),
            Arc::new(RecordingNotifier::new()),
            Arc::new(BroadcastHub::new()),
            Duration::from_secs(1),
        );

        Self {
            state,
            poster: Actor::new(UserId::new(), UserRole::User),
            provider: Actor::new(UserId::new(), UserRole::Provider),
            rival: Actor::new(UserId::new(), UserRole::Provider),
            task: None,
            provider_bid: None,
            rival_bid: None,
            last_result: None,
        }
    }

    /// Returns the scenario's task.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing posted task in scenario world"))
    }

    /// Records an operation outcome, keeping the latest successful task.
    pub fn record(&mut self, result: Result<Task, TaskLifecycleError>) {
        if let Ok(ref updated) = result {
            self.task = Some(updated.clone());
        }
        self.last_result = Some(result);
    }
}

impl Default for MarketplaceWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> MarketplaceWorld {
    MarketplaceWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
