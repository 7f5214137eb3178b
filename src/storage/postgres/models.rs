//! Diesel row models for the marketplace tables.

use super::schema::{chat_messages, providers, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task documents.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task aggregate JSON.
    pub document: Value,
    /// Stored version.
    pub version: i64,
}

/// Insert model for task documents.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Posting user.
    pub poster_id: uuid::Uuid,
    /// Lifecycle status.
    pub status: String,
    /// Category label.
    pub category: String,
    /// Task aggregate JSON.
    pub document: Value,
    /// Version being written.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied by version-checked task updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskChangeset {
    /// Lifecycle status.
    pub status: String,
    /// Category label.
    pub category: String,
    /// Task aggregate JSON.
    pub document: Value,
    /// Version being written.
    pub version: i64,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for provider documents.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = providers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProviderRow {
    /// Provider profile JSON.
    pub document: Value,
    /// Stored version.
    pub version: i64,
}

/// Insert model for provider documents.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = providers)]
pub struct NewProviderRow {
    /// Provider user identifier.
    pub id: uuid::Uuid,
    /// Provider profile JSON.
    pub document: Value,
    /// Version being written.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied by version-checked provider updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = providers)]
pub struct ProviderChangeset {
    /// Provider profile JSON.
    pub document: Value,
    /// Version being written.
    pub version: i64,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for chat messages.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chat_messages)]
pub struct NewMessageRow {
    /// Message identifier.
    pub id: uuid::Uuid,
    /// Task the conversation is about.
    pub task_id: uuid::Uuid,
    /// Sending user.
    pub sender_id: uuid::Uuid,
    /// Receiving user.
    pub receiver_id: uuid::Uuid,
    /// Message JSON.
    pub document: Value,
    /// Send timestamp.
    pub sent_at: DateTime<Utc>,
    /// Read receipt timestamp.
    pub read_at: Option<DateTime<Utc>>,
}
