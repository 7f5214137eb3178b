//! Task chat endpoints.

use super::{
    AppState,
    auth::AuthenticatedActor,
    error::ApiError,
    extract::{ApiJson, ApiPath},
};
use crate::chat::{
    domain::{ChatMessage, ChatSummary},
    services::SendMessageRequest,
};
use crate::identity::UserId;
use crate::storage::MarketplaceStore;
use crate::task::domain::TaskId;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Body of `POST /messages/:taskId`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageBody {
    /// Receiving user.
    pub receiver_id: Uuid,
    /// Message text.
    #[serde(default)]
    pub text: String,
    /// URI of an uploaded image.
    pub image_uri: Option<String>,
}

/// Body returned by `PUT /messages/:taskId/read`.
#[derive(Debug, Clone, Serialize)]
pub struct MarkReadResponse {
    /// Number of messages newly marked as read.
    pub marked: u32,
}

/// `POST /messages/:taskId`
pub async fn send_message<S: MarketplaceStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiPath(task_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<SendMessageBody>,
) -> Result<(StatusCode, Json<ChatMessage>), ApiError> {
    let request = SendMessageRequest {
        receiver: UserId::from_uuid(body.receiver_id),
        text: body.text,
        image_uri: body.image_uri,
    };
    let message = state
        .chat
        .send_message(&actor, TaskId::from_uuid(task_id), request)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// `GET /messages/:taskId`
pub async fn list_messages<S: MarketplaceStore>(
    State(state): State<Arc<AppState<S>>>,
    _actor: AuthenticatedActor,
    ApiPath(task_id): ApiPath<Uuid>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let messages = state
        .chat
        .list_messages(TaskId::from_uuid(task_id))
        .await?;
    Ok(Json(messages))
}

/// `PUT /messages/:taskId/read`
pub async fn mark_read<S: MarketplaceStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiPath(task_id): ApiPath<Uuid>,
) -> Result<Json<MarkReadResponse>, ApiError> {
    let marked = state
        .chat
        .mark_read(&actor, TaskId::from_uuid(task_id))
        .await?;
    Ok(Json(MarkReadResponse { marked }))
}

/// `GET /messages/summary`
pub async fn chat_summary<S: MarketplaceStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedActor(actor): AuthenticatedActor,
) -> Result<Json<Vec<ChatSummary>>, ApiError> {
    Ok(Json(state.chat.chat_summary(&actor).await?))
}
