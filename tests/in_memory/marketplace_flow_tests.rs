//! End-to-end marketplace flows through the service layer.

use super::helpers::{Marketplace, marketplace, provider, task_request, user};
use rstest::rstest;
use taskmarket::reputation::domain::ProviderRank;
use taskmarket::task::{
    domain::TaskStatus,
    ports::TaskFilter,
    services::{PlaceBidRequest, TaskLifecycleError},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn first_completion_leaves_provider_bronze(marketplace: Marketplace) {
    let poster = user();
    let worker = provider();
    marketplace.register(&worker, "Mill Lane Handyman").await;

    let task = marketplace.run_task(&poster, &worker, 5, true).await;

    assert_eq!(task.status(), TaskStatus::Completed);
    assert_eq!(task.assigned_provider(), Some(worker.user_id()));
    let profile = marketplace
        .state
        .providers
        .find(worker.user_id())
        .await
        .expect("provider lookup should succeed");
    let reputation = profile.reputation();
    assert_eq!(reputation.rank(), ProviderRank::Bronze);
    assert_eq!(reputation.average_rating(), 5.0);
    assert_eq!(reputation.completed_tasks(), 1);
    assert_eq!(reputation.recommendations(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reputation_climbs_through_every_tier(marketplace: Marketplace) {
    let poster = user();
    let worker = provider();
    marketplace.register(&worker, "Mill Lane Handyman").await;
    let mut ranks = Vec::new();

    for _ in 0..30 {
        marketplace.run_task(&poster, &worker, 5, true).await;
        let profile = marketplace
            .state
            .providers
            .find(worker.user_id())
            .await
            .expect("provider lookup should succeed");
        let rank = profile.reputation().rank();
        if ranks.last() != Some(&rank) {
            ranks.push(rank);
        }
    }

    assert_eq!(
        ranks,
        vec![
            ProviderRank::Bronze,
            ProviderRank::Silver,
            ProviderRank::Gold,
            ProviderRank::Platinum,
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rename_keeps_earned_reputation(marketplace: Marketplace) {
    let poster = user();
    let worker = provider();
    marketplace.register(&worker, "Mill Lane Handyman").await;
    marketplace.run_task(&poster, &worker, 4, false).await;

    let renamed = marketplace.register(&worker, "Mill Lane Repairs").await;

    assert_eq!(renamed.display_name(), "Mill Lane Repairs");
    assert_eq!(renamed.reputation().total_reviews(), 1);
    assert_eq!(renamed.reputation().average_rating(), 4.0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn poster_listing_shows_newest_first(marketplace: Marketplace) {
    let poster = user();
    let other = user();
    let tasks = &marketplace.state.tasks;
    let first = tasks
        .create_task(&poster, task_request("First"))
        .await
        .expect("task creation should succeed");
    tasks
        .create_task(&other, task_request("Someone else's"))
        .await
        .expect("task creation should succeed");
    let second = tasks
        .create_task(&poster, task_request("Second"))
        .await
        .expect("task creation should succeed");

    let listed = tasks
        .list_tasks(TaskFilter {
            poster: Some(poster.user_id()),
            ..TaskFilter::default()
        })
        .await
        .expect("listing should succeed");

    let ids: Vec<_> = listed.iter().map(|task| task.id()).collect();
    assert_eq!(ids, vec![second.id(), first.id()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_task_cannot_be_completed(marketplace: Marketplace) {
    let poster = user();
    let worker = provider();
    marketplace.register(&worker, "Mill Lane Handyman").await;
    let tasks = &marketplace.state.tasks;
    let task = tasks
        .create_task(&poster, task_request("Fix a gate"))
        .await
        .expect("task creation should succeed");
    let with_bid = tasks
        .place_bid(&worker, task.id(), PlaceBidRequest::new(50.0, "1 hour"))
        .await
        .expect("bid should succeed");
    let bid_id = with_bid.bids().first().map(|bid| bid.id()).expect("bid recorded");
    tasks
        .accept_bid(&poster, task.id(), bid_id)
        .await
        .expect("acceptance should succeed");
    let cancelled = tasks
        .change_status(&poster, task.id(), TaskStatus::Cancelled)
        .await
        .expect("cancellation should succeed");

    let result = tasks
        .complete_task(
            &poster,
            task.id(),
            taskmarket::task::services::CompleteTaskRequest::new(5, "", true),
        )
        .await;

    assert!(cancelled.assigned_provider().is_none());
    assert!(matches!(result, Err(TaskLifecycleError::Domain(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_stage_notifies_the_counterpart(marketplace: Marketplace) {
    let poster = user();
    let worker = provider();
    marketplace.register(&worker, "Mill Lane Handyman").await;

    marketplace.run_task(&poster, &worker, 5, true).await;

    let recipients: Vec<_> = marketplace
        .notifier
        .delivered()
        .iter()
        .map(|notice| notice.recipient())
        .collect();
    assert_eq!(
        recipients,
        vec![
            poster.user_id(),
            worker.user_id(),
            poster.user_id(),
            worker.user_id(),
        ]
    );
}
