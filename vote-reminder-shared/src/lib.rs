//! # Vote Reminder Shared
//! This crate defines the data structures shared across the vote reminder
//! workspace: vote records, opt preferences, inbound vote events and the
//! outbound signals delivered to the host application.
pub mod types;
