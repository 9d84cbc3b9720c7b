//! Outbound signal delivery to the host application.

use tokio::sync::broadcast;
use tracing::trace;
use vote_reminder_shared::types::Signal;

/// Default number of signals buffered per subscriber.
pub const DEFAULT_SIGNAL_CAPACITY: usize = 1024;

/// Broadcast bus carrying vote and reminder signals.
///
/// Every subscriber sees every signal emitted after it subscribed. Emitting
/// without subscribers drops the signal.
#[derive(Debug, Clone)]
pub struct SignalBus {
    sender: broadcast::Sender<Signal>,
}

impl SignalBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.sender.subscribe()
    }

    /// Emits a signal and returns how many subscribers received it.
    pub fn emit(&self, signal: Signal) -> usize {
        let name = signal.name();
        match self.sender.send(signal) {
            Ok(receivers) => receivers,
            Err(_) => {
                trace!(signal = name, "No subscribers for signal");
                0
            }
        }
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNAL_CAPACITY)
    }
}
