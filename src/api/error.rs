//! Mapping from service errors to JSON error responses.

use crate::chat::services::ChatServiceError;
use crate::reputation::{ports::ProviderRepositoryError, services::ProviderDirectoryError};
use crate::task::{
    domain::{TaskDomainError, TaskDomainErrorKind},
    ports::TaskRepositoryError,
    services::TaskLifecycleError,
};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt::Display;
use tracing::error;

const INTERNAL_MESSAGE: &str = "internal server error";

/// HTTP error returned by every handler as `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Creates an error with a user-visible message.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Missing or malformed identity headers.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Malformed request input.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Returns the response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Logs the detailed error and hides it behind a generic message.
    fn internal(err: &impl Display) -> Self {
        error!(error = %err, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }

    fn from_message(status: StatusCode, err: &impl Display) -> Self {
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

fn domain_status(err: &TaskDomainError) -> StatusCode {
    match err.kind() {
        TaskDomainErrorKind::Validation | TaskDomainErrorKind::InvalidState => {
            StatusCode::BAD_REQUEST
        }
        TaskDomainErrorKind::Missing => StatusCode::NOT_FOUND,
    }
}

fn task_repository_error(err: &TaskRepositoryError) -> ApiError {
    match err {
        TaskRepositoryError::NotFound(_) => ApiError::from_message(StatusCode::NOT_FOUND, err),
        TaskRepositoryError::Conflict(_) | TaskRepositoryError::ProviderConflict(_) => {
            ApiError::from_message(StatusCode::CONFLICT, err)
        }
        TaskRepositoryError::DuplicateTask(_)
        | TaskRepositoryError::ProviderNotFound(_)
        | TaskRepositoryError::Persistence(_) => ApiError::internal(err),
    }
}

fn provider_repository_error(err: &ProviderRepositoryError) -> ApiError {
    match err {
        ProviderRepositoryError::NotFound(_) => ApiError::from_message(StatusCode::NOT_FOUND, err),
        ProviderRepositoryError::Conflict(_) | ProviderRepositoryError::DuplicateProvider(_) => {
            ApiError::from_message(StatusCode::CONFLICT, err)
        }
        ProviderRepositoryError::Persistence(_) => ApiError::internal(err),
    }
}

impl From<TaskLifecycleError> for ApiError {
    fn from(err: TaskLifecycleError) -> Self {
        match &err {
            TaskLifecycleError::Domain(domain) => Self::from_message(domain_status(domain), domain),
            TaskLifecycleError::Review(_) | TaskLifecycleError::UnsupportedStatusChange(_) => {
                Self::from_message(StatusCode::BAD_REQUEST, &err)
            }
            TaskLifecycleError::TaskNotFound(_) | TaskLifecycleError::ProviderNotFound(_) => {
                Self::from_message(StatusCode::NOT_FOUND, &err)
            }
            TaskLifecycleError::Forbidden(_) => Self::from_message(StatusCode::FORBIDDEN, &err),
            TaskLifecycleError::InternalInconsistency { .. } => Self::internal(&err),
            TaskLifecycleError::Repository(repository) => task_repository_error(repository),
            TaskLifecycleError::ProviderRepository(repository) => {
                provider_repository_error(repository)
            }
        }
    }
}

impl From<ProviderDirectoryError> for ApiError {
    fn from(err: ProviderDirectoryError) -> Self {
        match &err {
            ProviderDirectoryError::Domain(_) => Self::from_message(StatusCode::BAD_REQUEST, &err),
            ProviderDirectoryError::Forbidden(_) => Self::from_message(StatusCode::FORBIDDEN, &err),
            ProviderDirectoryError::NotFound(_) => Self::from_message(StatusCode::NOT_FOUND, &err),
            ProviderDirectoryError::Repository(repository) => provider_repository_error(repository),
        }
    }
}

impl From<ChatServiceError> for ApiError {
    fn from(err: ChatServiceError) -> Self {
        match &err {
            ChatServiceError::Domain(_) => Self::from_message(StatusCode::BAD_REQUEST, &err),
            ChatServiceError::TaskNotFound(_) => Self::from_message(StatusCode::NOT_FOUND, &err),
            ChatServiceError::Repository(_) | ChatServiceError::TaskRepository(_) => {
                Self::internal(&err)
            }
        }
    }
}
