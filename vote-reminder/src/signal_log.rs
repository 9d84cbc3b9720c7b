//! Writes every tracker signal to the log, so a standalone deployment shows
//! votes and due reminders without an embedding application.

use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use vote_reminder_shared::types::Signal;

/// Logs signals until every sender is gone.
pub async fn log_signals(mut receiver: Receiver<Signal>) {
    loop {
        match receiver.recv().await {
            Ok(signal) => log_signal(&signal),
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Signal log fell behind, signals were dropped");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn log_signal(signal: &Signal) {
    match signal {
        Signal::Vote(payload) | Signal::TestVote(payload) => {
            let subject_id = payload
                .get("user")
                .and_then(|user| user.as_str())
                .unwrap_or_default();
            info!(
                signal = signal.name(),
                environment = %signal.environment(),
                subject_id = %subject_id,
                "Vote received"
            );
        }
        Signal::Reminder(record) | Signal::TestReminder(record) => {
            info!(
                signal = signal.name(),
                environment = %signal.environment(),
                subject_id = %record.subject_id,
                voted_at = %record.voted_at,
                "Reminder due"
            );
        }
    }
}
