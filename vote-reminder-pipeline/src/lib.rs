//! # Vote Reminder Pipeline
//! This crate wires vote stores into the running service.
//!
//! 1. **Dispatcher**: routes inbound vote events to the production or test store
//! 2. **Scheduler**: periodically sweeps a store for expired votes and emits reminders
//! 3. **Signals**: the broadcast bus the host application subscribes to
//! 4. **Tracker**: owns both environments and exposes the host-facing query surface
pub mod dispatcher;
pub mod errors;
pub mod scheduler;
pub mod signals;
pub mod tracker;

pub use dispatcher::WebhookDispatcher;
pub use errors::TrackerError;
pub use scheduler::{ReminderScheduler, SchedulerConfig, SweepReport};
pub use signals::SignalBus;
pub use tracker::{TrackerConfig, VoteTracker};
