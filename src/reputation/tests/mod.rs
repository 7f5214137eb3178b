//! Unit and service tests for provider reputation.
