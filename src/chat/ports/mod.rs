//! Port contracts for chat persistence and realtime fan-out.

mod broadcaster;
mod repository;

pub use broadcaster::{BroadcastError, BroadcastResult, Broadcaster};
pub use repository::{MessageRepository, MessageRepositoryError, MessageRepositoryResult};
