//! Shared fixtures for task service tests.

use std::sync::Arc;
use std::time::Duration;

use crate::identity::{Actor, UserId, UserRole};
use crate::notification::{NotificationDispatcher, adapters::RecordingNotifier};
use crate::reputation::{domain::Provider, ports::ProviderRepository};
use crate::storage::InMemoryMarketplaceStore;
use crate::task::{
    domain::{TaskCategory, TaskLocation},
    services::{CreateTaskRequest, TaskLifecycleService},
};
use mockable::DefaultClock;

pub(super) type TestService = TaskLifecycleService<InMemoryMarketplaceStore, DefaultClock>;

/// Service wired to an in-memory store and a recording notifier.
pub(super) struct Harness {
    pub service: TestService,
    pub store: Arc<InMemoryMarketplaceStore>,
    pub notifier: RecordingNotifier,
    pub poster: Actor,
    pub provider: Actor,
}

impl Harness {
    pub(super) fn new() -> Self {
        let store = Arc::new(InMemoryMarketplaceStore::new());
        let notifier = RecordingNotifier::new();
        let dispatcher =
            NotificationDispatcher::new(Arc::new(notifier.clone()), Duration::from_secs(1));
        Self {
            service: TaskLifecycleService::new(
                Arc::clone(&store),
                Arc::new(DefaultClock),
                dispatcher,
            ),
            store,
            notifier,
            poster: Actor::new(UserId::new(), UserRole::User),
            provider: Actor::new(UserId::new(), UserRole::Provider),
        }
    }

    /// Builds a harness whose provider already has a profile.
    pub(super) async fn with_provider_profile() -> Self {
        let harness = Self::new();
        harness.register(harness.provider).await;
        harness
    }

    pub(super) async fn register(&self, provider: Actor) {
        let profile = Provider::register(provider.user_id(), "Dana's Cleaning", &DefaultClock)
            .expect("valid provider profile");
        self.store
            .store_provider(&profile)
            .await
            .expect("provider profile should be stored");
    }
}

pub(super) fn cleaning_request() -> CreateTaskRequest {
    CreateTaskRequest {
        title: "Deep clean a two-bed flat".to_owned(),
        description: "Kitchen, bathroom, and windows".to_owned(),
        category: TaskCategory::Cleaning,
        budget: 120.0,
        deadline: None,
        location: TaskLocation::Remote,
        images: Vec::new(),
    }
}
