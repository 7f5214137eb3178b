//! Document stores implementing every repository port.
//!
//! One store type per backend implements [`crate::task::ports::TaskRepository`],
//! [`crate::reputation::ports::ProviderRepository`], and
//! [`crate::chat::ports::MessageRepository`], which lets task completion
//! commit the task and the provider in a single unit of work.

use crate::chat::ports::MessageRepository;
use crate::reputation::ports::ProviderRepository;
use crate::task::ports::TaskRepository;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryMarketplaceStore;
pub use postgres::{MarketplacePgPool, PostgresMarketplaceStore, StorageSetupError};

/// A backend implementing every repository port.
pub trait MarketplaceStore:
    TaskRepository + ProviderRepository + MessageRepository + 'static
{
}

impl<T> MarketplaceStore for T where
    T: TaskRepository + ProviderRepository + MessageRepository + 'static
{
}
