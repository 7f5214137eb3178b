//! Error types for reputation domain validation.

use thiserror::Error;

/// Errors returned while constructing or mutating reputation values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReputationDomainError {
    /// The review rating is outside the accepted range.
    #[error("rating {0} is out of range, expected 1 to 5")]
    InvalidRating(i64),

    /// The provider display name is empty after trimming.
    #[error("provider display name must not be empty")]
    EmptyDisplayName,
}
