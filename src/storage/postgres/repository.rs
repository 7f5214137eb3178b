//! `PostgreSQL` repository implementation for every marketplace port.

use super::{
    models::{
        NewMessageRow, NewProviderRow, NewTaskRow, ProviderChangeset, ProviderRow, TaskChangeset,
        TaskRow,
    },
    schema::{chat_messages, providers, tasks},
};
use crate::chat::{
    domain::ChatMessage,
    ports::{MessageRepository, MessageRepositoryError, MessageRepositoryResult},
};
use crate::identity::UserId;
use crate::reputation::{
    domain::Provider,
    ports::{ProviderRepository, ProviderRepositoryError, ProviderRepositoryResult},
};
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by the marketplace store.
pub type MarketplacePgPool = Pool<ConnectionManager<PgConnection>>;

const CREATE_MARKETPLACE_SQL: &str =
    include_str!("../../../migrations/2026-10-01-000000_create_marketplace/up.sql");

/// Errors raised while connecting to the database or applying the schema.
#[derive(Debug, Error)]
pub enum StorageSetupError {
    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),
    /// The schema could not be applied.
    #[error("failed to apply schema: {0}")]
    Schema(#[from] DieselError),
    /// The blocking setup task panicked or was cancelled.
    #[error("storage setup task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Repository errors that can wrap an infrastructure failure.
trait PersistenceFailure: Send + 'static {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

impl PersistenceFailure for TaskRepositoryError {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for ProviderRepositoryError {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for MessageRepositoryError {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl From<DieselError> for MessageRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed marketplace store.
#[derive(Debug, Clone)]
pub struct PostgresMarketplaceStore {
    pool: MarketplacePgPool,
}

impl PostgresMarketplaceStore {
    /// Creates a store from an existing connection pool.
    #[must_use]
    pub const fn new(pool: MarketplacePgPool) -> Self {
        Self { pool }
    }

    /// Builds a connection pool for `database_url` and wraps it in a store.
    ///
    /// # Errors
    ///
    /// Returns [`StorageSetupError`] when the pool cannot be established.
    pub async fn connect(database_url: &str, pool_size: u32) -> Result<Self, StorageSetupError> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = tokio::task::spawn_blocking(move || {
            Pool::builder().max_size(pool_size).build(manager)
        })
        .await??;
        Ok(Self::new(pool))
    }

    /// Creates the marketplace tables when they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageSetupError`] when no connection is available or the
    /// DDL fails.
    pub async fn bootstrap_schema(&self) -> Result<(), StorageSetupError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<(), StorageSetupError> {
            let mut connection = pool.get()?;
            connection.batch_execute(CREATE_MARKETPLACE_SQL)?;
            Ok(())
        })
        .await??;
        info!("marketplace schema ready");
        Ok(())
    }

    async fn run_blocking<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: PersistenceFailure,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(E::from_failure)?;
            f(&mut connection)
        })
        .await
        .map_err(E::from_failure)?
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(value)
}

fn decode<T: DeserializeOwned>(document: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(document)
}

/// Converts a version for storage together with the version it replaces.
fn version_pair(version: u64) -> Result<(i64, i64), std::num::TryFromIntError> {
    let next = i64::try_from(version)?;
    let previous = i64::try_from(version.saturating_sub(1))?;
    Ok((next, previous))
}

fn is_unique_violation(err: &DieselError) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

fn task_changeset<E: PersistenceFailure>(task: &Task) -> Result<(TaskChangeset, i64), E> {
    let (version, previous) = version_pair(task.version()).map_err(E::from_failure)?;
    let changeset = TaskChangeset {
        status: task.status().as_str().to_owned(),
        category: task.category().as_str().to_owned(),
        document: encode(task).map_err(E::from_failure)?,
        version,
        updated_at: task.updated_at(),
    };
    Ok((changeset, previous))
}

fn provider_changeset<E: PersistenceFailure>(
    provider: &Provider,
) -> Result<(ProviderChangeset, i64), E> {
    let (version, previous) = version_pair(provider.version()).map_err(E::from_failure)?;
    let changeset = ProviderChangeset {
        document: encode(provider).map_err(E::from_failure)?,
        version,
        updated_at: provider.updated_at(),
    };
    Ok((changeset, previous))
}

/// Outcome of a version-guarded single-row update.
enum GuardedUpdate {
    Applied,
    Missing,
    Stale,
}

fn update_task_row(
    connection: &mut PgConnection,
    id: Uuid,
    previous: i64,
    changeset: &TaskChangeset,
) -> Result<GuardedUpdate, DieselError> {
    let updated = diesel::update(
        tasks::table
            .filter(tasks::id.eq(id))
            .filter(tasks::version.eq(previous)),
    )
    .set(changeset)
    .execute(connection)?;
    if updated == 1 {
        return Ok(GuardedUpdate::Applied);
    }
    let exists = diesel::select(diesel::dsl::exists(tasks::table.filter(tasks::id.eq(id))))
        .get_result::<bool>(connection)?;
    Ok(if exists {
        GuardedUpdate::Stale
    } else {
        GuardedUpdate::Missing
    })
}

fn update_provider_row(
    connection: &mut PgConnection,
    id: Uuid,
    previous: i64,
    changeset: &ProviderChangeset,
) -> Result<GuardedUpdate, DieselError> {
    let updated = diesel::update(
        providers::table
            .filter(providers::id.eq(id))
            .filter(providers::version.eq(previous)),
    )
    .set(changeset)
    .execute(connection)?;
    if updated == 1 {
        return Ok(GuardedUpdate::Applied);
    }
    let exists = diesel::select(diesel::dsl::exists(
        providers::table.filter(providers::id.eq(id)),
    ))
    .get_result::<bool>(connection)?;
    Ok(if exists {
        GuardedUpdate::Stale
    } else {
        GuardedUpdate::Missing
    })
}

#[async_trait]
impl TaskRepository for PostgresMarketplaceStore {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let (version, _) = version_pair(task.version()).map_err(TaskRepositoryError::persistence)?;
        let new_row = NewTaskRow {
            id: task_id.into_inner(),
            poster_id: task.poster().into_inner(),
            status: task.status().as_str().to_owned(),
            category: task.category().as_str().to_owned(),
            document: encode(task).map_err(TaskRepositoryError::persistence)?,
            version,
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        TaskRepositoryError::DuplicateTask(task_id)
                    } else {
                        TaskRepositoryError::persistence(err)
                    }
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let (changeset, previous) = task_changeset::<TaskRepositoryError>(task)?;
        self.run_blocking(move |connection| {
            match update_task_row(connection, task_id.into_inner(), previous, &changeset)? {
                GuardedUpdate::Applied => Ok(()),
                GuardedUpdate::Missing => Err(TaskRepositoryError::NotFound(task_id)),
                GuardedUpdate::Stale => Err(TaskRepositoryError::Conflict(task_id)),
            }
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let criteria = *filter;
        self.run_blocking(move |connection| {
            let mut query = tasks::table.select(TaskRow::as_select()).into_boxed();
            if let Some(status) = criteria.status {
                query = query.filter(tasks::status.eq(status.as_str()));
            }
            if let Some(category) = criteria.category {
                query = query.filter(tasks::category.eq(category.as_str()));
            }
            if let Some(poster) = criteria.poster {
                query = query.filter(tasks::poster_id.eq(poster.into_inner()));
            }
            let rows = query
                .order(tasks::created_at.desc())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn commit_completion(
        &self,
        task: &Task,
        provider: &Provider,
    ) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let provider_id = provider.id();
        let (task_changes, task_previous) = task_changeset::<TaskRepositoryError>(task)?;
        let (provider_changes, provider_previous) =
            provider_changeset::<TaskRepositoryError>(provider)?;

        self.run_blocking(move |connection| {
            connection.transaction::<(), TaskRepositoryError, _>(|tx| {
                match update_provider_row(
                    tx,
                    provider_id.into_inner(),
                    provider_previous,
                    &provider_changes,
                )? {
                    GuardedUpdate::Applied => {}
                    GuardedUpdate::Missing => {
                        return Err(TaskRepositoryError::ProviderNotFound(provider_id));
                    }
                    GuardedUpdate::Stale => {
                        return Err(TaskRepositoryError::ProviderConflict(provider_id));
                    }
                }
                match update_task_row(tx, task_id.into_inner(), task_previous, &task_changes)? {
                    GuardedUpdate::Applied => Ok(()),
                    GuardedUpdate::Missing => Err(TaskRepositoryError::NotFound(task_id)),
                    GuardedUpdate::Stale => Err(TaskRepositoryError::Conflict(task_id)),
                }
            })
        })
        .await
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow { document, version } = row;
    let task: Task = decode(document).map_err(TaskRepositoryError::persistence)?;
    if i64::try_from(task.version()).ok() != Some(version) {
        return Err(TaskRepositoryError::persistence(std::io::Error::other(format!(
            "task {} document version does not match its row",
            task.id()
        ))));
    }
    Ok(task)
}

#[async_trait]
impl ProviderRepository for PostgresMarketplaceStore {
    async fn store_provider(&self, provider: &Provider) -> ProviderRepositoryResult<()> {
        let provider_id = provider.id();
        let (version, _) =
            version_pair(provider.version()).map_err(ProviderRepositoryError::persistence)?;
        let new_row = NewProviderRow {
            id: provider_id.into_inner(),
            document: encode(provider).map_err(ProviderRepositoryError::persistence)?,
            version,
            created_at: provider.created_at(),
            updated_at: provider.updated_at(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(providers::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        ProviderRepositoryError::DuplicateProvider(provider_id)
                    } else {
                        ProviderRepositoryError::persistence(err)
                    }
                })?;
            Ok(())
        })
        .await
    }

    async fn update_provider(&self, provider: &Provider) -> ProviderRepositoryResult<()> {
        let provider_id = provider.id();
        let (changeset, previous) = provider_changeset::<ProviderRepositoryError>(provider)?;
        self.run_blocking(move |connection| {
            let outcome =
                update_provider_row(connection, provider_id.into_inner(), previous, &changeset)
                    .map_err(ProviderRepositoryError::persistence)?;
            match outcome {
                GuardedUpdate::Applied => Ok(()),
                GuardedUpdate::Missing => Err(ProviderRepositoryError::NotFound(provider_id)),
                GuardedUpdate::Stale => Err(ProviderRepositoryError::Conflict(provider_id)),
            }
        })
        .await
    }

    async fn find_provider(&self, id: UserId) -> ProviderRepositoryResult<Option<Provider>> {
        self.run_blocking(move |connection| {
            let row = providers::table
                .filter(providers::id.eq(id.into_inner()))
                .select(ProviderRow::as_select())
                .first::<ProviderRow>(connection)
                .optional()
                .map_err(ProviderRepositoryError::persistence)?;
            row.map(row_to_provider).transpose()
        })
        .await
    }
}

fn row_to_provider(row: ProviderRow) -> ProviderRepositoryResult<Provider> {
    let ProviderRow { document, version } = row;
    let provider: Provider = decode(document).map_err(ProviderRepositoryError::persistence)?;
    if i64::try_from(provider.version()).ok() != Some(version) {
        return Err(ProviderRepositoryError::persistence(std::io::Error::other(
            format!("provider {} document version does not match its row", provider.id()),
        )));
    }
    Ok(provider)
}

#[async_trait]
impl MessageRepository for PostgresMarketplaceStore {
    async fn append_message(&self, message: &ChatMessage) -> MessageRepositoryResult<()> {
        let message_id = message.id();
        let new_row = NewMessageRow {
            id: message_id.into_inner(),
            task_id: message.task_id().into_inner(),
            sender_id: message.sender().into_inner(),
            receiver_id: message.receiver().into_inner(),
            document: encode(message).map_err(MessageRepositoryError::persistence)?,
            sent_at: message.sent_at(),
            read_at: message.read_at(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(chat_messages::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        MessageRepositoryError::DuplicateMessage(message_id)
                    } else {
                        MessageRepositoryError::persistence(err)
                    }
                })?;
            Ok(())
        })
        .await
    }

    async fn messages_for_task(
        &self,
        task_id: TaskId,
    ) -> MessageRepositoryResult<Vec<ChatMessage>> {
        self.run_blocking(move |connection| {
            let documents = chat_messages::table
                .filter(chat_messages::task_id.eq(task_id.into_inner()))
                .order((chat_messages::sent_at.asc(), chat_messages::sequence.asc()))
                .select(chat_messages::document)
                .load::<Value>(connection)?;
            decode_messages(documents)
        })
        .await
    }

    async fn messages_for_user(
        &self,
        user: UserId,
    ) -> MessageRepositoryResult<Vec<ChatMessage>> {
        let user_id = user.into_inner();
        self.run_blocking(move |connection| {
            let documents = chat_messages::table
                .filter(
                    chat_messages::sender_id
                        .eq(user_id)
                        .or(chat_messages::receiver_id.eq(user_id)),
                )
                .order((chat_messages::sent_at.asc(), chat_messages::sequence.asc()))
                .select(chat_messages::document)
                .load::<Value>(connection)?;
            decode_messages(documents)
        })
        .await
    }

    async fn mark_read(
        &self,
        task_id: TaskId,
        reader: UserId,
        at: DateTime<Utc>,
    ) -> MessageRepositoryResult<u32> {
        self.run_blocking(move |connection| {
            connection.transaction::<u32, MessageRepositoryError, _>(|tx| {
                let unread = chat_messages::table
                    .filter(chat_messages::task_id.eq(task_id.into_inner()))
                    .filter(chat_messages::receiver_id.eq(reader.into_inner()))
                    .filter(chat_messages::read_at.is_null())
                    .select((chat_messages::id, chat_messages::document))
                    .for_update()
                    .load::<(Uuid, Value)>(tx)?;

                let mut marked: u32 = 0;
                for (id, document) in unread {
                    let mut message: ChatMessage =
                        decode(document).map_err(MessageRepositoryError::persistence)?;
                    if !message.mark_read(at) {
                        continue;
                    }
                    let updated = encode(&message).map_err(MessageRepositoryError::persistence)?;
                    diesel::update(chat_messages::table.filter(chat_messages::id.eq(id)))
                        .set((
                            chat_messages::document.eq(updated),
                            chat_messages::read_at.eq(Some(at)),
                        ))
                        .execute(tx)?;
                    marked = marked.saturating_add(1);
                }
                Ok(marked)
            })
        })
        .await
    }
}

fn decode_messages(documents: Vec<Value>) -> MessageRepositoryResult<Vec<ChatMessage>> {
    documents
        .into_iter()
        .map(|document| decode(document).map_err(MessageRepositoryError::persistence))
        .collect()
}
