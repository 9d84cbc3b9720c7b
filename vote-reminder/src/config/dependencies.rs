//! Dependency initialization and wiring for the vote reminder service.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tracing::info;
use vote_reminder_pipeline::VoteTracker;

use super::AppConfig;
use crate::AppError;
use crate::server::{AppState, build_router};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The started tracker; its schedulers are already running.
    pub tracker: Arc<VoteTracker>,
    /// Router with the webhook and health endpoints.
    pub router: Router,
    /// Address the server listens on.
    pub addr: SocketAddr,
}

impl Dependencies {
    /// Opens both stores, starts the reminder schedulers and builds the
    /// router.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError::Tracker)` - A store could not be opened
    pub async fn new(config: AppConfig) -> Result<Self, AppError> {
        info!(
            webhook_path = %config.webhook_path,
            port = config.port,
            db_path = %config.tracker.production.location,
            test_db_path = %config.tracker.test.location,
            reminder_time_secs = config.tracker.production.reminder_threshold.as_secs(),
            test_reminder_time_secs = config.tracker.test.reminder_threshold.as_secs(),
            opt_in_default = config.tracker.production.opt_in_default,
            "Initializing dependencies"
        );

        let tracker = Arc::new(VoteTracker::new(config.tracker));
        tracker.init().await?;

        let state = AppState::new(Arc::clone(&tracker), config.authorization);
        let router = build_router(state, &config.webhook_path);
        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

        Ok(Self {
            tracker,
            router,
            addr,
        })
    }
}
