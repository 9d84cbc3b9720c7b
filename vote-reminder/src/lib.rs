//! # Vote Reminder
//!
//! Webhook service that records votes and reminds voters once they can vote
//! again.
//!
//! ## Modules
//!
//! - [`config`]: Environment configuration and dependency initialization
//! - [`server`]: Axum router with the webhook and health endpoints
//! - [`signal_log`]: Logs the signals emitted by the tracker
//! - [`errors`]: Error types for the service

pub mod config;
pub mod errors;
pub mod server;
pub mod signal_log;

pub use config::{AppConfig, Dependencies, LogFormat};
pub use errors::AppError;
