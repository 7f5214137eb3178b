//! Service tests for the completion and review engine.

use super::support::{Harness, cleaning_request};
use crate::identity::{Actor, UserId, UserRole};
use crate::reputation::{
    domain::{ProviderRank, ReputationDomainError},
    ports::ProviderRepository,
};
use crate::task::{
    domain::{NewTask, Task, TaskCategory, TaskDomainError, TaskLocation, TaskStatus},
    ports::TaskRepository,
    services::{CompleteTaskRequest, PlaceBidRequest, TaskLifecycleError},
};
use mockable::DefaultClock;

async fn assigned_task(harness: &Harness) -> Task {
    let task = harness
        .service
        .create_task(&harness.poster, cleaning_request())
        .await
        .expect("task creation should succeed");
    let with_bid = harness
        .service
        .place_bid(&harness.provider, task.id(), PlaceBidRequest::new(100.0, "1 day"))
        .await
        .expect("bid should succeed");
    let bid_id = with_bid
        .bids()
        .first()
        .map(|bid| bid.id())
        .expect("bid should be recorded");
    harness
        .service
        .accept_bid(&harness.poster, task.id(), bid_id)
        .await
        .expect("acceptance should succeed")
}

#[tokio::test(flavor = "multi_thread")]
async fn completion_records_review_and_ranks_provider() {
    let harness = Harness::with_provider_profile().await;
    let task = assigned_task(&harness).await;

    let completed = harness
        .service
        .complete_task(
            &harness.poster,
            task.id(),
            CompleteTaskRequest::new(5, "Spotless", true),
        )
        .await
        .expect("completion should succeed");

    assert_eq!(completed.status(), TaskStatus::Completed);
    let review = completed.review().expect("review should be attached");
    assert_eq!(review.rating().value(), 5);
    assert!(review.recommend());

    let provider = harness
        .store
        .find_provider(harness.provider.user_id())
        .await
        .expect("lookup should succeed")
        .expect("provider should exist");
    let reputation = provider.reputation();
    assert_eq!(reputation.rank(), ProviderRank::Bronze);
    assert_eq!(reputation.average_rating(), 5.0);
    assert_eq!(reputation.total_reviews(), 1);
    assert_eq!(reputation.completed_tasks(), 1);
    assert_eq!(reputation.recommendations(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn second_completion_updates_running_average() {
    let harness = Harness::with_provider_profile().await;
    for (stars, recommend) in [(5, true), (4, false)] {
        let task = assigned_task(&harness).await;
        harness
            .service
            .complete_task(
                &harness.poster,
                task.id(),
                CompleteTaskRequest::new(stars, "", recommend),
            )
            .await
            .expect("completion should succeed");
    }

    let provider = harness
        .store
        .find_provider(harness.provider.user_id())
        .await
        .expect("lookup should succeed")
        .expect("provider should exist");
    let reputation = provider.reputation();
    assert_eq!(reputation.average_rating(), 4.5);
    assert_eq!(reputation.rating_total(), 9);
    assert_eq!(reputation.completed_tasks(), 2);
    assert_eq!(reputation.recommendations(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn completing_twice_is_rejected_without_double_counting() {
    let harness = Harness::with_provider_profile().await;
    let task = assigned_task(&harness).await;
    harness
        .service
        .complete_task(&harness.poster, task.id(), CompleteTaskRequest::new(4, "", true))
        .await
        .expect("first completion should succeed");

    let result = harness
        .service
        .complete_task(&harness.poster, task.id(), CompleteTaskRequest::new(1, "", false))
        .await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::AlreadyCompleted))
    ));
    let provider = harness
        .store
        .find_provider(harness.provider.user_id())
        .await
        .expect("lookup should succeed")
        .expect("provider should exist");
    assert_eq!(provider.reputation().completed_tasks(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn only_the_poster_completes() {
    let harness = Harness::with_provider_profile().await;
    let task = assigned_task(&harness).await;

    for actor in [
        harness.provider,
        Actor::new(UserId::new(), UserRole::Admin),
    ] {
        let result = harness
            .service
            .complete_task(&actor, task.id(), CompleteTaskRequest::new(5, "", true))
            .await;
        assert!(matches!(result, Err(TaskLifecycleError::Forbidden(_))));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn out_of_range_rating_is_rejected() {
    let harness = Harness::with_provider_profile().await;
    let task = assigned_task(&harness).await;

    for stars in [0, 6, -3] {
        let result = harness
            .service
            .complete_task(&harness.poster, task.id(), CompleteTaskRequest::new(stars, "", true))
            .await;
        assert!(matches!(
            result,
            Err(TaskLifecycleError::Review(ReputationDomainError::InvalidRating(value)))
                if value == stars
        ));
    }
    let stored = harness
        .service
        .get_task(task.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(stored.status(), TaskStatus::InProgress);
}

#[tokio::test(flavor = "multi_thread")]
async fn active_task_cannot_complete() {
    let harness = Harness::with_provider_profile().await;
    let task = harness
        .service
        .create_task(&harness.poster, cleaning_request())
        .await
        .expect("task creation should succeed");

    let result = harness
        .service
        .complete_task(&harness.poster, task.id(), CompleteTaskRequest::new(5, "", true))
        .await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::InvalidStateTransition { .. }
        ))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn dangling_provider_is_an_internal_inconsistency() {
    let harness = Harness::new();
    let ghost = UserId::new();
    let clock = DefaultClock;
    let mut task = Task::create(
        NewTask {
            poster: harness.poster.user_id(),
            title: "Assemble a wardrobe".to_owned(),
            description: "Flat-pack, two doors".to_owned(),
            category: TaskCategory::Handyman,
            budget: 45.0,
            deadline: None,
            location: TaskLocation::Remote,
            images: Vec::new(),
        },
        &clock,
    )
    .expect("valid task");
    let bid_id = task
        .place_bid(ghost, 40.0, "3 hours", None, &clock)
        .expect("valid bid");
    task.accept_bid(bid_id, &clock).expect("acceptance should succeed");
    harness.store.store(&task).await.expect("task should be stored");

    let result = harness
        .service
        .complete_task(&harness.poster, task.id(), CompleteTaskRequest::new(5, "", true))
        .await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::InternalInconsistency { task: id, provider })
            if id == task.id() && provider == ghost
    ));
    let stored = harness
        .service
        .get_task(task.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(stored.status(), TaskStatus::InProgress);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_notifications_do_not_fail_completion() {
    let harness = Harness::with_provider_profile().await;
    let task = assigned_task(&harness).await;
    harness.notifier.fail_deliveries();

    let completed = harness
        .service
        .complete_task(&harness.poster, task.id(), CompleteTaskRequest::new(3, "", false))
        .await
        .expect("completion should succeed despite notifier failure");

    assert_eq!(completed.status(), TaskStatus::Completed);
}

#[tokio::test(flavor = "multi_thread")]
async fn completion_notifies_poster_and_provider() {
    let harness = Harness::with_provider_profile().await;
    let task = assigned_task(&harness).await;
    let before = harness.notifier.delivered().len();

    harness
        .service
        .complete_task(&harness.poster, task.id(), CompleteTaskRequest::new(5, "", true))
        .await
        .expect("completion should succeed");

    let recipients: Vec<UserId> = harness
        .notifier
        .delivered()
        .iter()
        .skip(before)
        .map(|notice| notice.recipient())
        .collect();
    assert_eq!(
        recipients,
        vec![harness.poster.user_id(), harness.provider.user_id()]
    );
}
