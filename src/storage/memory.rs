//! In-memory marketplace store for tests and database-less deployments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

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

/// Thread-safe in-memory store holding tasks, providers, and messages
/// behind a single lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarketplaceStore {
    state: Arc<RwLock<MarketplaceState>>,
}

#[derive(Debug, Default)]
struct MarketplaceState {
    tasks: HashMap<TaskId, Task>,
    task_order: Vec<TaskId>,
    providers: HashMap<UserId, Provider>,
    messages: Vec<ChatMessage>,
}

impl InMemoryMarketplaceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MarketplaceState>, std::io::Error> {
        self.state
            .read()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MarketplaceState>, std::io::Error> {
        self.state
            .write()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }
}

/// An update is accepted only when it is the direct successor of the
/// stored version.
const fn is_next_version(stored: u64, incoming: u64) -> bool {
    stored.saturating_add(1) == incoming
}

fn check_task_version(state: &MarketplaceState, task: &Task) -> TaskRepositoryResult<()> {
    let stored = state
        .tasks
        .get(&task.id())
        .ok_or(TaskRepositoryError::NotFound(task.id()))?;
    if is_next_version(stored.version(), task.version()) {
        Ok(())
    } else {
        Err(TaskRepositoryError::Conflict(task.id()))
    }
}

#[async_trait]
impl TaskRepository for InMemoryMarketplaceStore {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.task_order.push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        check_task_version(&state, task)?;
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        if state.tasks.remove(&id).is_none() {
            return Err(TaskRepositoryError::NotFound(id));
        }
        state.task_order.retain(|stored| *stored != id);
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        // Newest insertion first, then a stable sort keeps that order among
        // equal timestamps.
        let mut tasks: Vec<Task> = state
            .task_order
            .iter()
            .rev()
            .filter_map(|id| state.tasks.get(id))
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        tasks.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(tasks)
    }

    async fn commit_completion(
        &self,
        task: &Task,
        provider: &Provider,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        check_task_version(&state, task)?;
        let stored_provider = state
            .providers
            .get(&provider.id())
            .ok_or(TaskRepositoryError::ProviderNotFound(provider.id()))?;
        if !is_next_version(stored_provider.version(), provider.version()) {
            return Err(TaskRepositoryError::ProviderConflict(provider.id()));
        }

        state.providers.insert(provider.id(), provider.clone());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }
}

#[async_trait]
impl ProviderRepository for InMemoryMarketplaceStore {
    async fn store_provider(&self, provider: &Provider) -> ProviderRepositoryResult<()> {
        let mut state = self.write().map_err(ProviderRepositoryError::persistence)?;
        if state.providers.contains_key(&provider.id()) {
            return Err(ProviderRepositoryError::DuplicateProvider(provider.id()));
        }
        state.providers.insert(provider.id(), provider.clone());
        Ok(())
    }

    async fn update_provider(&self, provider: &Provider) -> ProviderRepositoryResult<()> {
        let mut state = self.write().map_err(ProviderRepositoryError::persistence)?;
        let stored = state
            .providers
            .get(&provider.id())
            .ok_or(ProviderRepositoryError::NotFound(provider.id()))?;
        if !is_next_version(stored.version(), provider.version()) {
            return Err(ProviderRepositoryError::Conflict(provider.id()));
        }
        state.providers.insert(provider.id(), provider.clone());
        Ok(())
    }

    async fn find_provider(&self, id: UserId) -> ProviderRepositoryResult<Option<Provider>> {
        let state = self.read().map_err(ProviderRepositoryError::persistence)?;
        Ok(state.providers.get(&id).cloned())
    }
}

/// Filters messages, keeping insertion order for equal send times.
fn ordered_messages(
    messages: &[ChatMessage],
    keep: impl Fn(&ChatMessage) -> bool,
) -> Vec<ChatMessage> {
    let mut selected: Vec<ChatMessage> = messages
        .iter()
        .filter(|message| keep(message))
        .cloned()
        .collect();
    selected.sort_by_key(ChatMessage::sent_at);
    selected
}

#[async_trait]
impl MessageRepository for InMemoryMarketplaceStore {
    async fn append_message(&self, message: &ChatMessage) -> MessageRepositoryResult<()> {
        let mut state = self.write().map_err(MessageRepositoryError::persistence)?;
        if state.messages.iter().any(|stored| stored.id() == message.id()) {
            return Err(MessageRepositoryError::DuplicateMessage(message.id()));
        }
        state.messages.push(message.clone());
        Ok(())
    }

    async fn messages_for_task(
        &self,
        task_id: TaskId,
    ) -> MessageRepositoryResult<Vec<ChatMessage>> {
        let state = self.read().map_err(MessageRepositoryError::persistence)?;
        Ok(ordered_messages(&state.messages, |message| message.task_id() == task_id))
    }

    async fn messages_for_user(
        &self,
        user: UserId,
    ) -> MessageRepositoryResult<Vec<ChatMessage>> {
        let state = self.read().map_err(MessageRepositoryError::persistence)?;
        Ok(ordered_messages(&state.messages, |message| message.involves(user)))
    }

    async fn mark_read(
        &self,
        task_id: TaskId,
        reader: UserId,
        at: DateTime<Utc>,
    ) -> MessageRepositoryResult<u32> {
        let mut state = self.write().map_err(MessageRepositoryError::persistence)?;
        let marked = state
            .messages
            .iter_mut()
            .filter(|message| message.task_id() == task_id && message.is_unread_by(reader))
            .filter_map(|message| message.mark_read(at).then_some(()))
            .count();
        Ok(u32::try_from(marked).unwrap_or(u32::MAX))
    }
}
