//! Unit and service tests for the task lifecycle.

mod completion_tests;
mod state_transition_tests;
mod support;
