//! Port contracts for provider reputation.

pub mod repository;

pub use repository::{ProviderRepository, ProviderRepositoryError, ProviderRepositoryResult};
