//! Provider profile endpoints.

use super::{
    AppState,
    auth::AuthenticatedActor,
    error::ApiError,
    extract::{ApiJson, ApiPath},
};
use crate::identity::UserId;
use crate::reputation::{domain::Provider, services::RegisterProviderRequest};
use crate::storage::MarketplaceStore;
use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Body of `PUT /providers/me`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterProviderBody {
    /// Public display name.
    pub display_name: String,
}

/// `PUT /providers/me`
pub async fn register_provider<S: MarketplaceStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiJson(body): ApiJson<RegisterProviderBody>,
) -> Result<Json<Provider>, ApiError> {
    let provider = state
        .providers
        .register(&actor, RegisterProviderRequest::new(body.display_name))
        .await?;
    Ok(Json(provider))
}

/// `GET /providers/:id`
pub async fn get_provider<S: MarketplaceStore>(
    State(state): State<Arc<AppState<S>>>,
    _actor: AuthenticatedActor,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Provider>, ApiError> {
    Ok(Json(state.providers.find(UserId::from_uuid(id)).await?))
}
