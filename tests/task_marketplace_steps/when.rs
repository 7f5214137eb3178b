//! When steps for task marketplace BDD scenarios.

use super::world::{MarketplaceWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskmarket::identity::{Actor, UserId, UserRole};
use taskmarket::task::{
    domain::BidId,
    services::{CompleteTaskRequest, PlaceBidRequest},
};

fn place_bid(world: &MarketplaceWorld, bidder: Actor, price: u32) -> Result<BidId, eyre::Report> {
    let task_id = world.task()?.id();
    let updated = run_async(world.state.tasks.place_bid(
        &bidder,
        task_id,
        PlaceBidRequest::new(f64::from(price), "1 day"),
    ))
    .wrap_err("place bid in scenario")?;
    updated
        .bids()
        .last()
        .map(|bid| bid.id())
        .ok_or_else(|| eyre::eyre!("bid was not recorded"))
}

fn accept(
    world: &mut MarketplaceWorld,
    actor: Actor,
    bid: Option<BidId>,
) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let bid_id = bid.ok_or_else(|| eyre::eyre!("missing bid in scenario world"))?;
    let result = run_async(world.state.tasks.accept_bid(&actor, task_id, bid_id));
    world.record(result);
    Ok(())
}

#[when("the provider bids {price:u32} on the task")]
fn provider_bids(world: &mut MarketplaceWorld, price: u32) -> Result<(), eyre::Report> {
    let bidder = world.provider;
    world.provider_bid = Some(place_bid(world, bidder, price)?);
    Ok(())
}

#[when("the rival bids {price:u32} on the task")]
fn rival_bids(world: &mut MarketplaceWorld, price: u32) -> Result<(), eyre::Report> {
    let bidder = world.rival;
    world.rival_bid = Some(place_bid(world, bidder, price)?);
    Ok(())
}

#[when("the poster accepts the provider's bid")]
fn poster_accepts_provider(world: &mut MarketplaceWorld) -> Result<(), eyre::Report> {
    let (poster, bid) = (world.poster, world.provider_bid);
    accept(world, poster, bid)
}

#[when("the poster accepts the rival's bid")]
fn poster_accepts_rival(world: &mut MarketplaceWorld) -> Result<(), eyre::Report> {
    let (poster, bid) = (world.poster, world.rival_bid);
    accept(world, poster, bid)
}

#[when("a stranger accepts the provider's bid")]
fn stranger_accepts(world: &mut MarketplaceWorld) -> Result<(), eyre::Report> {
    let stranger = Actor::new(UserId::new(), UserRole::User);
    let bid = world.provider_bid;
    accept(world, stranger, bid)
}

#[when("the poster completes the task with rating {rating:u32} and a recommendation")]
fn poster_completes(world: &mut MarketplaceWorld, rating: u32) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(world.state.tasks.complete_task(
        &world.poster,
        task_id,
        CompleteTaskRequest::new(i64::from(rating), "Scenario review", true),
    ));
    world.record(result);
    Ok(())
}
