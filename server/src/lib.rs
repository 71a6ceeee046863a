//! HTTP front end for the todo store.
//!
//! Routes `/todos` requests to handlers that each run against one
//! request-scoped session taken from the injected `SessionProvider`.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod routes;

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use todo_core::{SessionProvider, StoreError, TodoSession};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use db::SqliteStore;
pub use error::{ApiError, ServerError, NOT_FOUND_DETAIL};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    sessions: Arc<dyn SessionProvider>,
}

impl AppState {
    pub fn new<P>(provider: P) -> Self
    where
        P: SessionProvider + 'static,
    {
        Self {
            sessions: Arc::new(provider),
        }
    }

    /// Open a request-scoped session; it is released when dropped.
    pub async fn session(&self) -> Result<Box<dyn TodoSession>, StoreError> {
        self.sessions.acquire().await
    }
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until the listener fails.
pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    serve(listener, state, std::future::pending()).await
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
