use std::sync::{mpsc::Sender, Arc};

use tokio::{runtime::Handle, task::JoinHandle};

use crate::{
    domain::events::{AppEvent, HistoryOutcome, HistoryTicket},
    usecases::{
        contracts::HistoryRequester,
        load_history::{load_history, HistorySource},
    },
};

const HISTORY_RESULT_FORWARD_FAILED: &str = "HISTORY_RESULT_FORWARD_FAILED";

/// Runs one history fetch at a time on the runtime; a newer request aborts
/// the one still in flight.
pub struct TaskHistoryRequester {
    runtime: Handle,
    source: Arc<dyn HistorySource>,
    event_tx: Sender<AppEvent>,
    in_flight: Option<JoinHandle<()>>,
}

impl TaskHistoryRequester {
    pub fn new(runtime: Handle, source: Arc<dyn HistorySource>, event_tx: Sender<AppEvent>) -> Self {
        Self {
            runtime,
            source,
            event_tx,
            in_flight: None,
        }
    }
}

impl HistoryRequester for TaskHistoryRequester {
    fn request(&mut self, ticket: HistoryTicket, peer: &str) {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }

        let source = Arc::clone(&self.source);
        let event_tx = self.event_tx.clone();
        let peer = peer.to_owned();

        tracing::debug!(ticket = ticket.value(), peer = %peer, "history fetch started");

        self.in_flight = Some(self.runtime.spawn(async move {
            let result = load_history(source.as_ref(), &peer)
                .await
                .map_err(|error| error.user_message());

            let outcome = HistoryOutcome {
                ticket,
                peer,
                result,
            };
            if let Err(error) = event_tx.send(AppEvent::HistoryLoaded(outcome)) {
                tracing::warn!(
                    code = HISTORY_RESULT_FORWARD_FAILED,
                    error = %error,
                    "history result dropped: UI channel closed"
                );
            }
        }));
    }
}

impl Drop for TaskHistoryRequester {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.abort();
        }
    }
}
