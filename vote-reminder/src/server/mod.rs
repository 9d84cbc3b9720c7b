//! HTTP server setup and routing.
pub mod webhook;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use vote_reminder_pipeline::VoteTracker;

use crate::AppError;

/// Route of the liveness probe.
pub const HEALTH_PATH: &str = "/health";

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<VoteTracker>,
    /// Expected value of the `Authorization` header.
    pub authorization: Arc<str>,
}

impl AppState {
    pub fn new(tracker: Arc<VoteTracker>, authorization: impl Into<Arc<str>>) -> Self {
        Self {
            tracker,
            authorization: authorization.into(),
        }
    }
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Builds the router with the webhook mounted at `webhook_path`.
pub fn build_router(state: AppState, webhook_path: &str) -> Router {
    Router::new()
        .route(webhook_path, post(webhook::webhook_handler))
        .route(HEALTH_PATH, get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves `app` on `addr` until `shutdown` resolves, then drains in-flight
/// requests.
pub async fn run_server<F>(app: Router, addr: SocketAddr, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server stopped");
    Ok(())
}
