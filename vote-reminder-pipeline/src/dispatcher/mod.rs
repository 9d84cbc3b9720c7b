//! This module defines the `WebhookDispatcher`, which routes validated vote
//! events to the store of their environment and announces them to the host.
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::error;
use vote_reminder_repository::VoteStore;
use vote_reminder_shared::types::{Environment, Signal, VoteEvent};

use crate::signals::SignalBus;

/// Routes inbound vote events by environment.
#[derive(Clone)]
pub struct WebhookDispatcher {
    production: Arc<dyn VoteStore>,
    test: Arc<dyn VoteStore>,
    signals: SignalBus,
}

impl WebhookDispatcher {
    pub fn new(
        production: Arc<dyn VoteStore>,
        test: Arc<dyn VoteStore>,
        signals: SignalBus,
    ) -> Self {
        Self {
            production,
            test,
            signals,
        }
    }

    fn store(&self, environment: Environment) -> &Arc<dyn VoteStore> {
        match environment {
            Environment::Production => &self.production,
            Environment::Test => &self.test,
        }
    }

    /// Records the vote in the event's store and emits the matching vote
    /// signal with the raw payload.
    ///
    /// The write runs on its own task and is not awaited: a failure is
    /// logged and never retried. The returned handle completes once the
    /// write has finished; dropping it is the normal fire-and-forget path.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, event: VoteEvent) -> JoinHandle<()> {
        let VoteEvent {
            subject_id,
            environment,
            raw,
            voted_at,
        } = event;

        let store = Arc::clone(self.store(environment));
        let write = tokio::spawn(async move {
            let result = match voted_at {
                Some(voted_at) => store.record_vote_at(&subject_id, voted_at).await,
                None => store.record_vote(&subject_id).await,
            };
            if let Err(e) = result {
                error!(
                    subject_id = %subject_id,
                    environment = %environment,
                    error = %e,
                    "Failed to record vote"
                );
            }
        });

        self.signals.emit(Signal::vote(environment, raw));
        write
    }
}
