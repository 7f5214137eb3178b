//! Application services for task lifecycle orchestration.

mod assignment;
mod bidding;
mod completion;
mod discussion;
mod lifecycle;

pub use bidding::PlaceBidRequest;
pub use completion::CompleteTaskRequest;
pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
};
