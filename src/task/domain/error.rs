//! Error types for task domain validation and lifecycle rules.

use super::{BidId, CommentId, TaskStatus};
use thiserror::Error;

/// Broad classification of a [`TaskDomainError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskDomainErrorKind {
    /// Malformed or out-of-range input.
    Validation,
    /// The operation is not valid for the task's current status or contents.
    InvalidState,
    /// A referenced embedded entity does not exist.
    Missing,
}

/// Errors returned while constructing or mutating task values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The budget is zero, negative, or not finite.
    #[error("budget must be a positive number")]
    InvalidBudget,

    /// The bid price is zero, negative, or not finite.
    #[error("bid price must be a positive number")]
    InvalidPrice,

    /// The bid estimated time is empty after trimming.
    #[error("estimated time must not be empty")]
    EmptyEstimatedTime,

    /// The category value is unsupported.
    #[error("unsupported task category: {0}")]
    UnknownCategory(String),

    /// The location is malformed.
    #[error("invalid location: {0}")]
    InvalidLocation(&'static str),

    /// More images were supplied than a task may carry.
    #[error("a task may carry at most {max} images, got {actual}")]
    TooManyImages {
        /// Maximum number of images.
        max: usize,
        /// Number of images supplied.
        actual: usize,
    },

    /// An image URI is empty after trimming.
    #[error("image URIs must not be empty")]
    BlankImageUri,

    /// Comment or reply text is empty after trimming.
    #[error("comment text must not be empty")]
    EmptyCommentText,

    /// The requested status change is not permitted.
    #[error("cannot move task from {from} to {to}")]
    InvalidStateTransition {
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// Bids are only accepted while the task is active.
    #[error("task is not open for bidding while {0}")]
    NotAcceptingBids(TaskStatus),

    /// Task details can only be edited while the task is active.
    #[error("task cannot be edited while {0}")]
    NotEditable(TaskStatus),

    /// Task details are frozen once a bid exists.
    #[error("task details cannot be edited once bids have been placed")]
    EditingFrozen,

    /// The task has already been completed.
    #[error("task is already completed")]
    AlreadyCompleted,

    /// Completed tasks are kept as the record of the review.
    #[error("completed tasks cannot be deleted")]
    NotDeletable,

    /// No bid with the identifier exists on the task.
    #[error("bid {0} not found")]
    BidNotFound(BidId),

    /// No comment with the identifier exists on the task.
    #[error("comment {0} not found")]
    CommentNotFound(CommentId),
}

impl TaskDomainError {
    /// Classifies the error for callers that map it to a response.
    #[must_use]
    pub const fn kind(&self) -> TaskDomainErrorKind {
        match self {
            Self::InvalidStateTransition { .. }
            | Self::NotAcceptingBids(_)
            | Self::NotEditable(_)
            | Self::EditingFrozen
            | Self::AlreadyCompleted
            | Self::NotDeletable => TaskDomainErrorKind::InvalidState,
            Self::BidNotFound(_) | Self::CommentNotFound(_) => TaskDomainErrorKind::Missing,
            Self::EmptyTitle
            | Self::EmptyDescription
            | Self::InvalidBudget
            | Self::InvalidPrice
            | Self::EmptyEstimatedTime
            | Self::UnknownCategory(_)
            | Self::InvalidLocation(_)
            | Self::TooManyImages { .. }
            | Self::BlankImageUri
            | Self::EmptyCommentText => TaskDomainErrorKind::Validation,
        }
    }
}

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
