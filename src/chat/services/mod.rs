//! Application services for task chat.

mod messaging;

pub use messaging::{
    ChatService, ChatServiceError, ChatServiceResult, SendMessageRequest, task_channel,
};
