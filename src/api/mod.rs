//! HTTP surface of the marketplace.
//!
//! Handlers authenticate the caller through [`auth::AuthenticatedActor`],
//! delegate to the services held in [`AppState`], and translate service
//! errors into `{"message": ...}` bodies through [`error::ApiError`].

pub mod auth;
pub mod chat;
pub mod error;
pub mod extract;
pub mod health;
pub mod providers;
pub mod tasks;

use crate::chat::{ports::Broadcaster, services::ChatService};
use crate::notification::{NotificationDispatcher, Notifier};
use crate::reputation::services::ProviderDirectoryService;
use crate::storage::MarketplaceStore;
use crate::task::services::TaskLifecycleService;
use axum::Router;
use axum::routing::{get, post, put};
use mockable::DefaultClock;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Services shared by every request.
pub struct AppState<S: MarketplaceStore> {
    /// Task store, bidding, assignment, completion, and discussion.
    pub tasks: TaskLifecycleService<S, DefaultClock>,
    /// Provider profiles.
    pub providers: ProviderDirectoryService<S, DefaultClock>,
    /// Task chat.
    pub chat: ChatService<S, DefaultClock>,
}

impl<S: MarketplaceStore> AppState<S> {
    /// Wires the services around one store and the shared collaborators.
    ///
    /// Requests wait for their notifications, bounded by
    /// `notification_timeout`.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        notifier: Arc<dyn Notifier>,
        broadcaster: Arc<dyn Broadcaster>,
        notification_timeout: Duration,
    ) -> Self {
        Self::with_notifications(
            store,
            NotificationDispatcher::new(notifier, notification_timeout),
            broadcaster,
        )
    }

    /// Wires the services around an already configured notification
    /// dispatcher.
    #[must_use]
    pub fn with_notifications(
        store: Arc<S>,
        notifications: NotificationDispatcher,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Self {
        let clock = Arc::new(DefaultClock);
        Self {
            tasks: TaskLifecycleService::new(Arc::clone(&store), Arc::clone(&clock), notifications),
            providers: ProviderDirectoryService::new(Arc::clone(&store), Arc::clone(&clock)),
            chat: ChatService::new(store, clock, broadcaster),
        }
    }
}

/// Builds the application router.
pub fn router<S: MarketplaceStore>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/tasks",
            post(tasks::create_task::<S>).get(tasks::list_tasks::<S>),
        )
        .route(
            "/tasks/:id",
            get(tasks::get_task::<S>)
                .patch(tasks::edit_task::<S>)
                .delete(tasks::delete_task::<S>),
        )
        .route("/tasks/:id/status", put(tasks::change_status::<S>))
        .route("/tasks/:id/bid", post(tasks::place_bid::<S>))
        .route("/tasks/:id/acceptBid/:bid_id", put(tasks::accept_bid::<S>))
        .route("/tasks/:id/completeTask", put(tasks::complete_task::<S>))
        .route("/tasks/:id/comment", post(tasks::add_comment::<S>))
        .route(
            "/tasks/:id/comment/:comment_id/reply",
            post(tasks::add_reply::<S>),
        )
        .route("/providers/me", put(providers::register_provider::<S>))
        .route("/providers/:id", get(providers::get_provider::<S>))
        .route("/messages/summary", get(chat::chat_summary::<S>))
        .route(
            "/messages/:task_id",
            post(chat::send_message::<S>).get(chat::list_messages::<S>),
        )
        .route("/messages/:task_id/read", put(chat::mark_read::<S>))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the router on `addr` until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an I/O error when the listener cannot be bound or the server
/// fails.
pub async fn serve<S: MarketplaceStore>(
    addr: SocketAddr,
    state: Arc<AppState<S>>,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "server listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received");
}
