//! Shared helpers for in-memory marketplace integration tests.

use std::sync::Arc;
use std::time::Duration;

use rstest::fixture;
use taskmarket::api::AppState;
use taskmarket::chat::adapters::BroadcastHub;
use taskmarket::identity::{Actor, UserId, UserRole};
use taskmarket::notification::adapters::RecordingNotifier;
use taskmarket::reputation::{domain::Provider, services::RegisterProviderRequest};
use taskmarket::storage::InMemoryMarketplaceStore;
use taskmarket::task::{
    domain::{Task, TaskCategory, TaskLocation},
    services::{CompleteTaskRequest, CreateTaskRequest, PlaceBidRequest},
};

/// Fully wired marketplace backed by the in-memory store.
pub struct Marketplace {
    pub state: AppState<InMemoryMarketplaceStore>,
    pub notifier: RecordingNotifier,
    pub hub: BroadcastHub,
}

/// Fixture providing a fresh marketplace.
#[fixture]
pub fn marketplace() -> Marketplace {
    let notifier = RecordingNotifier::new();
    let hub = BroadcastHub::new();
    let state = AppState::new(
        Arc::new(InMemoryMarketplaceStore::new()),
        Arc::new(notifier.clone()),
        Arc::new(hub.clone()),
        Duration::from_secs(1),
    );
    Marketplace {
        state,
        notifier,
        hub,
    }
}

pub fn user() -> Actor {
    Actor::new(UserId::new(), UserRole::User)
}

pub fn provider() -> Actor {
    Actor::new(UserId::new(), UserRole::Provider)
}

pub fn task_request(title: &str) -> CreateTaskRequest {
    CreateTaskRequest {
        title: title.to_owned(),
        description: "Integration test task".to_owned(),
        category: TaskCategory::Handyman,
        budget: 75.0,
        deadline: None,
        location: TaskLocation::Physical {
            address: "4 Mill Lane".to_owned(),
            lat: 53.48,
            lng: -2.24,
        },
        images: Vec::new(),
    }
}

impl Marketplace {
    pub async fn register(&self, actor: &Actor, name: &str) -> Provider {
        self.state
            .providers
            .register(actor, RegisterProviderRequest::new(name))
            .await
            .expect("provider registration should succeed")
    }

    /// Runs one task from posting to completion and returns the final task.
    pub async fn run_task(
        &self,
        poster: &Actor,
        provider: &Actor,
        rating: i64,
        recommend: bool,
    ) -> Task {
        let tasks = &self.state.tasks;
        let task = tasks
            .create_task(poster, task_request("Hang three shelves"))
            .await
            .expect("task creation should succeed");
        let with_bid = tasks
            .place_bid(provider, task.id(), PlaceBidRequest::new(70.0, "2 hours"))
            .await
            .expect("bid should succeed");
        let bid_id = with_bid
            .bids()
            .last()
            .map(|bid| bid.id())
            .expect("bid should be recorded");
        tasks
            .accept_bid(poster, task.id(), bid_id)
            .await
            .expect("acceptance should succeed");
        tasks
            .complete_task(
                poster,
                task.id(),
                CompleteTaskRequest::new(rating, "Tidy work", recommend),
            )
            .await
            .expect("completion should succeed")
    }
}
