//! Adapter implementations of the chat ports.

mod hub;

pub use hub::BroadcastHub;
