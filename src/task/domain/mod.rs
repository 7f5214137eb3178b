//! Domain model for the task lifecycle.
//!
//! A task is posted as `Active`, collects bids, moves to `InProgress` when
//! its poster accepts one bid, and ends either `Completed` with a review or
//! `Cancelled`. Bids, comments, and replies are owned by the task aggregate
//! and kept in insertion order.

mod bid;
mod category;
mod comment;
mod error;
mod ids;
mod location;
mod review;
mod task;

pub use bid::Bid;
pub use category::TaskCategory;
pub use comment::{Comment, Reply};
pub use error::{ParseTaskStatusError, TaskDomainError, TaskDomainErrorKind};
pub use ids::{BidId, CommentId, ReplyId, TaskId};
pub use location::TaskLocation;
pub use review::TaskReview;
pub use task::{NewTask, Task, TaskEdit, TaskStatus};
