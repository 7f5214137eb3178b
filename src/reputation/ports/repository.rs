//! Repository port for provider profile persistence.

use crate::identity::UserId;
use crate::reputation::domain::Provider;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for provider repository operations.
pub type ProviderRepositoryResult<T> = Result<T, ProviderRepositoryError>;

/// Provider persistence contract.
///
/// Writes are compare-and-swap on [`Provider::version`]: an update succeeds
/// only when the stored version is exactly one behind the supplied provider.
#[async_trait]
pub trait ProviderRepository: Send + Sync {
    /// Stores a newly registered provider.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderRepositoryError::DuplicateProvider`] when a profile
    /// already exists for the user.
    async fn store_provider(&self, provider: &Provider) -> ProviderRepositoryResult<()>;

    /// Persists changes to an existing provider.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderRepositoryError::NotFound`] when the provider does
    /// not exist or [`ProviderRepositoryError::Conflict`] when it was
    /// modified concurrently.
    async fn update_provider(&self, provider: &Provider) -> ProviderRepositoryResult<()>;

    /// Finds a provider by user identifier.
    ///
    /// Returns `None` when no profile exists.
    async fn find_provider(&self, id: UserId) -> ProviderRepositoryResult<Option<Provider>>;
}

/// Errors returned by provider repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProviderRepositoryError {
    /// A profile for the user already exists.
    #[error("duplicate provider profile: {0}")]
    DuplicateProvider(UserId),

    /// The provider was not found.
    #[error("provider not found: {0}")]
    NotFound(UserId),

    /// The stored provider version moved since it was read.
    #[error("provider {0} was modified concurrently")]
    Conflict(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProviderRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
