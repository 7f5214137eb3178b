//! Step definitions for task marketplace BDD scenarios.

mod given;
mod then;
mod when;
pub mod world;
