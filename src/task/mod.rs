//! Task lifecycle for the marketplace.
//!
//! A task is posted `Active`, collects bids, moves to `InProgress` when its
//! poster accepts one, and ends `Completed` with a review or `Cancelled`.
//! Completing a task updates the assigned provider's reputation in the same
//! unit of work. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Orchestration services in [`services`]
//!
//! Persistence adapters live in [`crate::storage`].

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
