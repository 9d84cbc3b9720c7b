//! Vote Reminder Main Entry Point
//!
//! Serves the vote webhook, records votes per environment and emits reminder
//! signals once a vote has aged past the reminder threshold.

use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use vote_reminder::server::run_server;
use vote_reminder::signal_log::log_signals;
use vote_reminder::{AppConfig, AppError, Dependencies, LogFormat};

/// Initialize tracing/logging.
fn init_tracing(format: LogFormat) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "vote_reminder=info,vote_reminder_pipeline=info,vote_reminder_repository=info",
        )
    });

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init(),
        LogFormat::Console => registry
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init(),
    };
    result.map_err(|e| AppError::config(format!("Failed to initialize tracing: {e}")))?;

    info!(
        service_name = "vote-reminder",
        service_version = env!("CARGO_PKG_VERSION"),
        log_format = ?format,
        "Tracing initialized"
    );
    Ok(())
}

/// Resolves on ctrl-c.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            // Without a signal handler the service runs until killed.
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing(LogFormat::from_env())?;

    info!("Starting vote reminder service");

    let config = AppConfig::from_env().inspect_err(|e| {
        error!(error = %e, "Invalid configuration");
    })?;

    let Dependencies {
        tracker,
        router,
        addr,
    } = match Dependencies::new(config).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    tokio::spawn(log_signals(tracker.subscribe()));

    let served = run_server(router, addr, shutdown_signal()).await;
    if let Err(e) = &served {
        error!(error = %e, "Server failed");
    }

    tracker.shutdown().await;
    info!("Vote reminder service stopped");
    served
}
