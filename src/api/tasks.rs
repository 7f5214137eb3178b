//! Task, bid, completion, and comment endpoints.

use super::{
    AppState,
    auth::AuthenticatedActor,
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
};
use crate::identity::UserId;
use crate::storage::MarketplaceStore;
use crate::task::{
    domain::{BidId, CommentId, Task, TaskCategory, TaskEdit, TaskId, TaskLocation, TaskStatus},
    ports::TaskFilter,
    services::{CompleteTaskRequest, CreateTaskRequest, PlaceBidRequest},
};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Loosely typed location as submitted by clients.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationBody {
    /// `remote` or `physical`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Street address for physical locations.
    pub address: Option<String>,
    /// Latitude for physical locations.
    pub lat: Option<f64>,
    /// Longitude for physical locations.
    pub lng: Option<f64>,
}

impl LocationBody {
    fn into_location(self) -> Result<TaskLocation, ApiError> {
        TaskLocation::from_parts(&self.kind, self.address, self.lat, self.lng)
            .map_err(|err| ApiError::bad_request(err.to_string()))
    }
}

fn parse_category(raw: &str) -> Result<TaskCategory, ApiError> {
    TaskCategory::try_from(raw).map_err(|err| ApiError::bad_request(err.to_string()))
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskBody {
    /// Short summary.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Offered budget.
    pub budget: f64,
    /// Optional deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Location.
    pub location: LocationBody,
    /// Uploaded image URIs.
    #[serde(default)]
    pub images: Vec<String>,
}

/// Body of `PATCH /tasks/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTaskBody {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement category label.
    pub category: Option<String>,
    /// Replacement budget.
    pub budget: Option<f64>,
    /// Replacement deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Replacement location.
    pub location: Option<LocationBody>,
    /// Replacement image URIs.
    pub images: Option<Vec<String>>,
}

/// Query string of `GET /tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTasksQuery {
    /// Status filter.
    pub status: Option<String>,
    /// Category filter.
    pub category: Option<String>,
    /// Poster filter.
    pub poster: Option<Uuid>,
}

/// Body of `PUT /tasks/:id/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusBody {
    /// Requested status.
    pub status: String,
}

/// Body of `POST /tasks/:id/bid`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidBody {
    /// Offered price.
    pub price: f64,
    /// Time estimate.
    pub estimated_time: String,
    /// Optional note.
    pub comment: Option<String>,
}

/// Body of `PUT /tasks/:id/completeTask`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteTaskBody {
    /// Star rating from 1 to 5.
    pub rating: i64,
    /// Review text.
    #[serde(default)]
    pub comment: String,
    /// Whether the provider is recommended.
    #[serde(default)]
    pub recommend: bool,
}

/// Body of comment and reply endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentBody {
    /// Comment text.
    pub text: String,
}

/// `POST /tasks`
pub async fn create_task<S: MarketplaceStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiJson(body): ApiJson<CreateTaskBody>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let request = CreateTaskRequest {
        title: body.title,
        description: body.description,
        category: parse_category(&body.category)?,
        budget: body.budget,
        deadline: body.deadline,
        location: body.location.into_location()?,
        images: body.images,
    };
    let task = state.tasks.create_task(&actor, request).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /tasks`
pub async fn list_tasks<S: MarketplaceStore>(
    State(state): State<Arc<AppState<S>>>,
    _actor: AuthenticatedActor,
    ApiQuery(query): ApiQuery<ListTasksQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(TaskStatus::try_from)
        .transpose()
        .map_err(|err| ApiError::bad_request(err.to_string()))?;
    let category = query.category.as_deref().map(parse_category).transpose()?;
    let filter = TaskFilter {
        status,
        category,
        poster: query.poster.map(UserId::from_uuid),
    };
    Ok(Json(state.tasks.list_tasks(filter).await?))
}

/// `GET /tasks/:id`
pub async fn get_task<S: MarketplaceStore>(
    State(state): State<Arc<AppState<S>>>,
    _actor: AuthenticatedActor,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.tasks.get_task(TaskId::from_uuid(id)).await?))
}

/// `PATCH /tasks/:id`
pub async fn edit_task<S: MarketplaceStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<EditTaskBody>,
) -> Result<Json<Task>, ApiError> {
    let edit = TaskEdit {
        title: body.title,
        description: body.description,
        category: body.category.as_deref().map(parse_category).transpose()?,
        budget: body.budget,
        deadline: body.deadline,
        location: body.location.map(LocationBody::into_location).transpose()?,
        images: body.images,
    };
    let task = state
        .tasks
        .edit_task(&actor, TaskId::from_uuid(id), edit)
        .await?;
    Ok(Json(task))
}

/// `PUT /tasks/:id/status`
pub async fn change_status<S: MarketplaceStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<StatusBody>,
) -> Result<Json<Task>, ApiError> {
    let status = TaskStatus::try_from(body.status.as_str())
        .map_err(|err| ApiError::bad_request(err.to_string()))?;
    let task = state
        .tasks
        .change_status(&actor, TaskId::from_uuid(id), status)
        .await?;
    Ok(Json(task))
}

/// `DELETE /tasks/:id`
pub async fn delete_task<S: MarketplaceStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .tasks
        .delete_task(&actor, TaskId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /tasks/:id/bid`
pub async fn place_bid<S: MarketplaceStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<PlaceBidBody>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let request = PlaceBidRequest {
        price: body.price,
        estimated_time: body.estimated_time,
        comment: body.comment,
    };
    let task = state
        .tasks
        .place_bid(&actor, TaskId::from_uuid(id), request)
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /tasks/:id/acceptBid/:bidId`
pub async fn accept_bid<S: MarketplaceStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiPath((id, bid_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Task>, ApiError> {
    let task = state
        .tasks
        .accept_bid(&actor, TaskId::from_uuid(id), BidId::from_uuid(bid_id))
        .await?;
    Ok(Json(task))
}

/// `PUT /tasks/:id/completeTask`
pub async fn complete_task<S: MarketplaceStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<CompleteTaskBody>,
) -> Result<Json<Task>, ApiError> {
    let request = CompleteTaskRequest::new(body.rating, body.comment, body.recommend);
    let task = state
        .tasks
        .complete_task(&actor, TaskId::from_uuid(id), request)
        .await?;
    Ok(Json(task))
}

/// `POST /tasks/:taskId/comment`
pub async fn add_comment<S: MarketplaceStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiPath(task_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<CommentBody>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state
        .tasks
        .add_comment(&actor, TaskId::from_uuid(task_id), body.text)
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `POST /tasks/:taskId/comment/:commentId/reply`
pub async fn add_reply<S: MarketplaceStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    ApiPath((task_id, comment_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(body): ApiJson<CommentBody>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state
        .tasks
        .add_reply(
            &actor,
            TaskId::from_uuid(task_id),
            CommentId::from_uuid(comment_id),
            body.text,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}
