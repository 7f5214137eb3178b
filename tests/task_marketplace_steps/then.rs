//! Then steps for task marketplace BDD scenarios.

use super::world::{MarketplaceWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use taskmarket::reputation::domain::ProviderRank;
use taskmarket::task::{
    domain::{TaskDomainError, TaskStatus},
    services::TaskLifecycleError,
};

fn last_error(world: &MarketplaceWorld) -> Result<&TaskLifecycleError, eyre::Report> {
    match world.last_result.as_ref() {
        Some(Err(err)) => Ok(err),
        Some(Ok(task)) => Err(eyre::eyre!(
            "expected the last operation to fail, got task in {}",
            task.status()
        )),
        None => Err(eyre::eyre!("no operation was attempted")),
    }
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &MarketplaceWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let stored = run_async(world.state.tasks.get_task(world.task()?.id()))
        .wrap_err("reload task")?;
    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            stored.status()
        ));
    }
    Ok(())
}

#[then(r#"the provider rank is "{rank}""#)]
fn provider_rank_is(world: &MarketplaceWorld, rank: String) -> Result<(), eyre::Report> {
    let profile = run_async(world.state.providers.find(world.provider.user_id()))
        .wrap_err("load provider profile")?;
    let actual: ProviderRank = profile.reputation().rank();
    if actual.as_str() != rank {
        return Err(eyre::eyre!("expected rank {rank}, found {actual}"));
    }
    Ok(())
}

#[then(r#"the provider has {count:u32} completed task with an average rating of "{average}""#)]
fn provider_statistics(
    world: &MarketplaceWorld,
    count: u32,
    average: String,
) -> Result<(), eyre::Report> {
    let profile = run_async(world.state.providers.find(world.provider.user_id()))
        .wrap_err("load provider profile")?;
    let reputation = profile.reputation();
    let actual_average = format!("{:.1}", reputation.average_rating());
    if reputation.completed_tasks() != count || actual_average != average {
        return Err(eyre::eyre!(
            "expected {count} tasks averaging {average}, found {} averaging {actual_average}",
            reputation.completed_tasks()
        ));
    }
    Ok(())
}

#[then("the operation fails with an invalid state transition")]
fn fails_with_invalid_transition(world: &MarketplaceWorld) -> Result<(), eyre::Report> {
    let err = last_error(world)?;
    if !matches!(
        err,
        TaskLifecycleError::Domain(TaskDomainError::InvalidStateTransition { .. })
    ) {
        return Err(eyre::eyre!("expected InvalidStateTransition, got {err:?}"));
    }
    Ok(())
}

#[then("the operation fails because the task is already completed")]
fn fails_as_already_completed(world: &MarketplaceWorld) -> Result<(), eyre::Report> {
    let err = last_error(world)?;
    if !matches!(
        err,
        TaskLifecycleError::Domain(TaskDomainError::AlreadyCompleted)
    ) {
        return Err(eyre::eyre!("expected AlreadyCompleted, got {err:?}"));
    }
    Ok(())
}

#[then("the operation is forbidden")]
fn operation_is_forbidden(world: &MarketplaceWorld) -> Result<(), eyre::Report> {
    let err = last_error(world)?;
    if !matches!(err, TaskLifecycleError::Forbidden(_)) {
        return Err(eyre::eyre!("expected Forbidden, got {err:?}"));
    }
    Ok(())
}

#[then("the task is assigned to the provider")]
fn task_assigned_to_provider(world: &MarketplaceWorld) -> Result<(), eyre::Report> {
    let stored = run_async(world.state.tasks.get_task(world.task()?.id()))
        .wrap_err("reload task")?;
    if stored.assigned_provider() != Some(world.provider.user_id()) {
        return Err(eyre::eyre!(
            "expected assignment to {}, found {:?}",
            world.provider.user_id(),
            stored.assigned_provider()
        ));
    }
    Ok(())
}
