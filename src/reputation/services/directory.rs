//! Service layer for provider profile registration and lookup.

use crate::identity::{Actor, UserId, UserRole};
use crate::reputation::{
    domain::{Provider, ReputationDomainError},
    ports::{ProviderRepository, ProviderRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating or renaming the acting provider's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterProviderRequest {
    display_name: String,
}

impl RegisterProviderRequest {
    /// Creates a registration request.
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
        }
    }
}

/// Service-level errors for provider directory operations.
#[derive(Debug, Error)]
pub enum ProviderDirectoryError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ReputationDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProviderRepositoryError),
    /// The actor may not perform the operation.
    #[error("{0}")]
    Forbidden(&'static str),
    /// No profile exists for the user.
    #[error("provider {0} not found")]
    NotFound(UserId),
}

/// Result type for provider directory operations.
pub type ProviderDirectoryResult<T> = Result<T, ProviderDirectoryError>;

/// Provider profile orchestration service.
pub struct ProviderDirectoryService<P, C>
where
    P: ProviderRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<P>,
    clock: Arc<C>,
}

impl<P, C> ProviderDirectoryService<P, C>
where
    P: ProviderRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new provider directory service.
    #[must_use]
    pub const fn new(repository: Arc<P>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates the acting provider's profile, or renames it when it exists.
    ///
    /// Reputation is never modified here.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderDirectoryError::Forbidden`] unless the actor holds
    /// the provider role, domain errors for a blank name, or repository
    /// errors.
    pub async fn register(
        &self,
        actor: &Actor,
        request: RegisterProviderRequest,
    ) -> ProviderDirectoryResult<Provider> {
        if actor.role() != UserRole::Provider {
            return Err(ProviderDirectoryError::Forbidden(
                "only providers can register a provider profile",
            ));
        }

        if let Some(mut existing) = self.repository.find_provider(actor.user_id()).await? {
            existing.rename(request.display_name, &*self.clock)?;
            self.repository.update_provider(&existing).await?;
            return Ok(existing);
        }

        let provider = Provider::register(actor.user_id(), request.display_name, &*self.clock)?;
        self.repository.store_provider(&provider).await?;
        info!(provider_id = %provider.id(), "registered provider profile");
        Ok(provider)
    }

    /// Retrieves a provider profile.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderDirectoryError::NotFound`] when no profile exists or
    /// repository errors.
    pub async fn find(&self, id: UserId) -> ProviderDirectoryResult<Provider> {
        self.repository
            .find_provider(id)
            .await?
            .ok_or(ProviderDirectoryError::NotFound(id))
    }
}
