//! Provider reputation for the task marketplace.
//!
//! Providers accumulate reviews as the tasks assigned to them are completed.
//! The aggregate statistics feed the rank calculator, which derives the
//! provider's reputation tier. The module follows hexagonal architecture:
//!
//! - Domain types and the pure rank calculator in [`domain`]
//! - Port contracts in [`ports`]
//! - Orchestration services in [`services`]
//!
//! Persistence adapters live in [`crate::storage`] because completing a task
//! writes a provider and a task in one atomic unit.

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
