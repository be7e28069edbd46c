use anyhow::Result;

use crate::domain::{
    events::{AppEvent, HistoryTicket, InboundMessage},
    shell_state::ShellState,
};

pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;

    /// True once the source can never produce another event.
    fn is_exhausted(&self) -> bool {
        false
    }
}

pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    fn state_mut(&mut self) -> &mut ShellState;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;
}

/// Starts the history fetch for a conversation. The outcome comes back as
/// `AppEvent::HistoryLoaded` carrying the same ticket.
pub trait HistoryRequester {
    fn request(&mut self, ticket: HistoryTicket, peer: &str);
}

/// What happened to the composed text on `on_send`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    Skipped,
    Failed,
}

/// The chat view's reactions to user input and server pushes.
pub trait ChatEventHandler {
    fn on_select(&mut self, username: &str);
    fn on_message(&mut self, message: InboundMessage);
    fn on_presence(&mut self, online: &[String]);
    fn on_send(&mut self) -> SendOutcome;
}
