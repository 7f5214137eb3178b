//! Validation errors for chat messages.

use thiserror::Error;

/// Errors returned while composing chat messages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatDomainError {
    /// Neither text nor an image was supplied.
    #[error("message must contain text or an image")]
    EmptyMessage,

    /// Sender and receiver are the same user.
    #[error("cannot send a message to yourself")]
    SelfAddressed,
}
