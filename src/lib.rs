//! Taskmarket: task-marketplace backend.
//!
//! Users post tasks, providers bid on them, the poster accepts one bid and
//! finally completes the task with a review that re-ranks the provider.
//! Chat and notifications ride alongside as best-effort side channels.
//!
//! # Architecture
//!
//! Taskmarket follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, transport)
//!
//! # Modules
//!
//! - [`identity`]: Acting principal supplied by the authentication layer
//! - [`task`]: Task store plus the bidding, assignment, and completion engines
//! - [`reputation`]: Provider profiles and the rank calculator
//! - [`notification`]: Best-effort user notifications
//! - [`chat`]: Task-scoped messaging with realtime broadcast
//! - [`storage`]: In-memory and `PostgreSQL` stores for every port
//! - [`api`]: HTTP routes
//! - [`config`]: Environment configuration

pub mod api;
pub mod chat;
pub mod config;
pub mod identity;
pub mod notification;
pub mod reputation;
pub mod storage;
pub mod task;
