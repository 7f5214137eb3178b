//! `PostgreSQL` document store.
//!
//! Aggregates are stored as JSONB documents next to the columns used for
//! filtering and compare-and-swap versioning. Task completion writes the
//! task and provider rows inside one transaction.

mod models;
mod repository;
mod schema;

pub use repository::{MarketplacePgPool, PostgresMarketplaceStore, StorageSetupError};
