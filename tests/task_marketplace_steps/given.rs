//! Given steps for task marketplace BDD scenarios.

use super::world::{MarketplaceWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskmarket::reputation::services::RegisterProviderRequest;
use taskmarket::task::{
    domain::{TaskCategory, TaskLocation},
    services::CreateTaskRequest,
};

#[given(r#"a poster has posted a "{label}" task with a budget of {budget:u32}"#)]
fn poster_has_posted_task(
    world: &mut MarketplaceWorld,
    label: String,
    budget: u32,
) -> Result<(), eyre::Report> {
    let category = TaskCategory::try_from(label.as_str())
        .map_err(|err| eyre::eyre!("invalid category in scenario: {err}"))?;
    let request = CreateTaskRequest {
        title: format!("{category} job"),
        description: "Posted from a behaviour scenario".to_owned(),
        category,
        budget: f64::from(budget),
        deadline: None,
        location: TaskLocation::Remote,
        images: Vec::new(),
    };
    let task = run_async(world.state.tasks.create_task(&world.poster, request))
        .wrap_err("post task for scenario")?;
    world.task = Some(task);
    Ok(())
}

#[given(r#"a registered provider named "{name}""#)]
fn registered_provider(world: &mut MarketplaceWorld, name: String) -> Result<(), eyre::Report> {
    run_async(
        world
            .state
            .providers
            .register(&world.provider, RegisterProviderRequest::new(name)),
    )
    .wrap_err("register provider for scenario")?;
    Ok(())
}

#[given(r#"a rival provider named "{name}""#)]
fn rival_provider(world: &mut MarketplaceWorld, name: String) -> Result<(), eyre::Report> {
    run_async(
        world
            .state
            .providers
            .register(&world.rival, RegisterProviderRequest::new(name)),
    )
    .wrap_err("register rival provider for scenario")?;
    Ok(())
}
