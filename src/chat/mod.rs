//! Task-scoped direct messaging with realtime fan-out.
//!
//! Messages are persisted through [`ports::MessageRepository`] and then
//! pushed best-effort to subscribers of the task's channel through
//! [`ports::Broadcaster`]. The broadcast handle is constructed once at
//! startup and handed to [`services::ChatService`].

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
