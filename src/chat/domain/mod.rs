//! Domain model for task chat.

mod error;
mod message;

pub use error::ChatDomainError;
pub use message::{ChatMessage, ChatSummary, MessageId};
