//! Unit and service tests for task chat.

mod hub_tests;
