//! Runs the task marketplace HTTP server.
//!
//! Configuration comes from the environment (see [`taskmarket::config`]).
//! When `DATABASE_URL` is set the `PostgreSQL` store is used and its schema
//! is created on startup; otherwise everything is kept in memory.

use anyhow::Context;
use std::sync::Arc;
use taskmarket::api::{self, AppState};
use taskmarket::chat::adapters::BroadcastHub;
use taskmarket::config::AppConfig;
use taskmarket::notification::{NotificationDispatcher, adapters::TracingNotifier};
use taskmarket::storage::{InMemoryMarketplaceStore, MarketplaceStore, PostgresMarketplaceStore};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskmarket=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    match &config.database {
        Some(database) => {
            let store = PostgresMarketplaceStore::connect(&database.url, database.pool_size)
                .await
                .context("failed to connect to PostgreSQL")?;
            store
                .bootstrap_schema()
                .await
                .context("failed to prepare the database schema")?;
            info!(pool_size = database.pool_size, "using PostgreSQL store");
            run(&config, store).await
        }
        None => {
            info!("DATABASE_URL not set; using in-memory store");
            run(&config, InMemoryMarketplaceStore::new()).await
        }
    }
}

async fn run<S: MarketplaceStore>(config: &AppConfig, store: S) -> anyhow::Result<()> {
    let state = Arc::new(AppState::with_notifications(
        Arc::new(store),
        NotificationDispatcher::detached(Arc::new(TracingNotifier), config.notification_timeout),
        Arc::new(BroadcastHub::new()),
    ));
    api::serve(config.bind_addr, state)
        .await
        .context("server terminated with an error")
}
