//! Notifier collaborator used by the task lifecycle and chat services.
//!
//! Delivery is always best-effort: a failed or slow notification is logged
//! and never turns a successful core operation into an error.

pub mod adapters;
mod dispatch;
pub mod ports;

pub use dispatch::{DeliveryMode, NotificationDispatcher};
pub use ports::{Notification, Notifier, NotifierError, NotifierResult};
