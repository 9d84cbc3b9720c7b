//! Service configuration read from the process environment.

pub mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use vote_reminder_pipeline::{SchedulerConfig, TrackerConfig};
use vote_reminder_pipeline::scheduler::DEFAULT_SWEEP_INTERVAL;
use vote_reminder_repository::StoreConfig;
use vote_reminder_repository::config::{
    DEFAULT_LOCATION, DEFAULT_REMINDER_THRESHOLD_SECS, DEFAULT_TEST_REMINDER_THRESHOLD_SECS,
    MEMORY_LOCATION,
};

use crate::AppError;
use crate::server::HEALTH_PATH;

/// Default route of the webhook endpoint.
pub const DEFAULT_WEBHOOK_PATH: &str = "/topggwebhook";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event, for log shippers.
    Json,
    /// Human readable multi-line output.
    Console,
}

impl LogFormat {
    /// Reads `LOG_FORMAT`. Only `json` (case-insensitive) selects JSON output.
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT") {
            Ok(value) if value.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Console,
        }
    }
}

/// Everything the service needs to start.
#[derive(Clone)]
pub struct AppConfig {
    /// Expected value of the inbound `Authorization` header.
    pub authorization: String,
    pub webhook_path: String,
    pub port: u16,
    pub tracker: TrackerConfig,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("authorization", &"<redacted>")
            .field("webhook_path", &self.webhook_path)
            .field("port", &self.port)
            .field("tracker", &self.tracker)
            .finish()
    }
}

impl AppConfig {
    /// Reads the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `WEBHOOK_AUTHORIZATION`: Shared webhook secret (required)
    /// - `WEBHOOK_PATH`: Webhook route (default: /topggwebhook)
    /// - `PORT`: Listen port (default: 3000)
    /// - `DB_PATH`: Production database file (default: ./voters.db)
    /// - `REMINDER_TIME_SECS`: Production reminder threshold (default: 43200)
    /// - `SWEEP_INTERVAL_MS`: Production sweep period (default: 10000)
    /// - `TEST_DB_PATH`: Test database location (default: :memory:)
    /// - `TEST_REMINDER_TIME_SECS`: Test reminder threshold (default: 30)
    /// - `TEST_SWEEP_INTERVAL_MS`: Test sweep period (default: `SWEEP_INTERVAL_MS`)
    /// - `REMINDERS_OPT_IN_DEFAULT`: Opt-in for subjects without a preference (default: false)
    ///
    /// # Returns
    ///
    /// * `Ok(AppConfig)` - Validated configuration
    /// * `Err(AppError::Config)` - A required variable is missing or a value is invalid
    pub fn from_env() -> Result<Self, AppError> {
        let authorization = env::var("WEBHOOK_AUTHORIZATION")
            .ok()
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::config("WEBHOOK_AUTHORIZATION must be set"))?;

        let webhook_path = parse_webhook_path(
            env::var("WEBHOOK_PATH").unwrap_or_else(|_| DEFAULT_WEBHOOK_PATH.to_string()),
        )?;

        let port = parse_var("PORT", DEFAULT_PORT)?;
        let opt_in_default = parse_bool("REMINDERS_OPT_IN_DEFAULT", false)?;

        let sweep_interval = parse_interval(
            "SWEEP_INTERVAL_MS",
            DEFAULT_SWEEP_INTERVAL.as_millis() as u64,
        )?;
        let test_sweep_interval =
            parse_interval("TEST_SWEEP_INTERVAL_MS", sweep_interval.as_millis() as u64)?;

        let production = StoreConfig::default()
            .with_location(env::var("DB_PATH").unwrap_or_else(|_| DEFAULT_LOCATION.to_string()))
            .with_reminder_threshold(Duration::from_secs(parse_var(
                "REMINDER_TIME_SECS",
                DEFAULT_REMINDER_THRESHOLD_SECS,
            )?))
            .with_opt_in_default(opt_in_default);

        let test = StoreConfig::test_default()
            .with_location(
                env::var("TEST_DB_PATH").unwrap_or_else(|_| MEMORY_LOCATION.to_string()),
            )
            .with_reminder_threshold(Duration::from_secs(parse_var(
                "TEST_REMINDER_TIME_SECS",
                DEFAULT_TEST_REMINDER_THRESHOLD_SECS,
            )?))
            .with_opt_in_default(opt_in_default);

        Ok(Self {
            authorization,
            webhook_path,
            port,
            tracker: TrackerConfig {
                production,
                test,
                production_schedule: SchedulerConfig::with_interval(sweep_interval),
                test_schedule: SchedulerConfig::with_interval(test_sweep_interval),
            },
        })
    }
}

/// The webhook route is mounted verbatim, so it must be a literal path the
/// router accepts: no `:param` or `*wildcard` segments.
fn parse_webhook_path(path: String) -> Result<String, AppError> {
    if !path.starts_with('/') {
        return Err(AppError::config(format!(
            "WEBHOOK_PATH must start with '/', got {path:?}"
        )));
    }
    if path == HEALTH_PATH {
        return Err(AppError::config(format!(
            "WEBHOOK_PATH must not be {HEALTH_PATH}"
        )));
    }
    if path
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
    {
        return Err(AppError::config(format!(
            "WEBHOOK_PATH must be a literal path without ':' or '*' segments, got {path:?}"
        )));
    }
    Ok(path)
}

fn parse_var<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} {value:?}: {e}"))),
        Err(_) => Ok(default),
    }
}

fn parse_bool(key: &str, default: bool) -> Result<bool, AppError> {
    match env::var(key) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(AppError::config(format!(
                "Invalid {key} {value:?}: expected true or false"
            ))),
        },
        Err(_) => Ok(default),
    }
}

fn parse_interval(key: &str, default_ms: u64) -> Result<Duration, AppError> {
    let millis = parse_var(key, default_ms)?;
    if millis == 0 {
        return Err(AppError::config(format!("{key} must be greater than zero")));
    }
    Ok(Duration::from_millis(millis))
}
