//! Behaviour tests for the bidding, assignment, and completion engines.

#[path = "task_marketplace_steps/mod.rs"]
mod task_marketplace_steps_defs;

use rstest_bdd_macros::scenario;
use task_marketplace_steps_defs::world::{MarketplaceWorld, world};

#[scenario(
    path = "tests/features/task_marketplace.feature",
    name = "Provider wins a task and earns a first review"
)]
#[tokio::test(flavor = "multi_thread")]
async fn provider_wins_and_is_reviewed(world: MarketplaceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_marketplace.feature",
    name = "An accepted assignment is never overwritten"
)]
#[tokio::test(flavor = "multi_thread")]
async fn assignment_is_never_overwritten(world: MarketplaceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_marketplace.feature",
    name = "A completed task cannot be completed again"
)]
#[tokio::test(flavor = "multi_thread")]
async fn completion_is_not_repeated(world: MarketplaceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_marketplace.feature",
    name = "Only the poster may accept a bid"
)]
#[tokio::test(flavor = "multi_thread")]
async fn only_poster_accepts(world: MarketplaceWorld) {
    let _ = world;
}
