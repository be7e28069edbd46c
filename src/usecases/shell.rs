use anyhow::Result;

use crate::domain::{
    events::{AppEvent, HistoryOutcome, HistoryTicket, InboundMessage, KeyInput},
    message::Message,
    shell_state::{ActivePane, ShellState},
};

use super::{
    contracts::{ChatEventHandler, HistoryRequester, SendOutcome, ShellOrchestrator},
    send_message::{send_message, MessageEmitter, SendMessageError},
};

const SEND_DISCONNECTED_NOTICE: &str = "Not connected: message was not sent";
const HISTORY_RESULT_STALE: &str = "CHAT_HISTORY_RESULT_STALE";
const HISTORY_LOAD_FAILED: &str = "CHAT_HISTORY_LOAD_FAILED";
const SEND_FAILED: &str = "CHAT_SEND_FAILED";

pub struct DefaultShellOrchestrator<H, E>
where
    H: HistoryRequester,
    E: MessageEmitter,
{
    state: ShellState,
    history: H,
    emitter: E,
    last_ticket: HistoryTicket,
    awaited_ticket: Option<HistoryTicket>,
}

impl<H, E> DefaultShellOrchestrator<H, E>
where
    H: HistoryRequester,
    E: MessageEmitter,
{
    pub fn new(state: ShellState, history: H, emitter: E) -> Self {
        Self {
            state,
            history,
            emitter,
            last_ticket: HistoryTicket::default(),
            awaited_ticket: None,
        }
    }

    fn on_history_loaded(&mut self, outcome: HistoryOutcome) {
        if self.awaited_ticket != Some(outcome.ticket) {
            tracing::debug!(
                code = HISTORY_RESULT_STALE,
                ticket = outcome.ticket.value(),
                peer = %outcome.peer,
                "dropping history result for a superseded selection"
            );
            return;
        }
        self.awaited_ticket = None;

        match outcome.result {
            Ok(messages) => self.render_history(messages),
            Err(reason) => {
                tracing::warn!(
                    code = HISTORY_LOAD_FAILED,
                    peer = %outcome.peer,
                    reason = %reason,
                    "history could not be loaded"
                );
                self.state.messages_mut().set_error(reason);
            }
        }
    }

    fn render_history(&mut self, messages: Vec<Message>) {
        tracing::debug!(count = messages.len(), "rendering conversation history");
        let current_username = self.state.session().current_username().to_owned();
        self.state
            .messages_mut()
            .render_history(messages, &current_username);
    }

    fn handle_key(&mut self, key: KeyInput) {
        if key.key == "tab" {
            self.state.cycle_focus();
            return;
        }

        match self.state.active_pane() {
            ActivePane::UserList => self.handle_user_list_key(&key),
            ActivePane::Messages => self.handle_messages_key(&key),
            ActivePane::Composer => self.handle_composer_key(&key),
        }
    }

    fn handle_user_list_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "q" => self.state.stop(),
            "j" | "down" => self.state.users_mut().select_next(),
            "k" | "up" => self.state.users_mut().select_previous(),
            "enter" | "l" => {
                let target = self
                    .state
                    .users()
                    .entry_at_cursor()
                    .map(|entry| entry.username.clone());
                if let Some(username) = target {
                    self.on_select(&username);
                }
            }
            _ => {}
        }
    }

    fn handle_messages_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "q" => self.state.stop(),
            "k" | "up" => self.state.messages_mut().scroll_up(1),
            "j" | "down" => self.state.messages_mut().scroll_down(1),
            "i" => self.state.focus(ActivePane::Composer),
            "h" | "esc" => self.state.focus(ActivePane::UserList),
            _ => {}
        }
    }

    fn handle_composer_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "enter" => {
                self.on_send();
                return;
            }
            "esc" => {
                self.state.focus(ActivePane::Messages);
                return;
            }
            _ => {}
        }

        let composer = self.state.composer_mut();
        match key.key.as_str() {
            "backspace" => composer.backspace(),
            "delete" => composer.delete(),
            "left" => composer.move_left(),
            "right" => composer.move_right(),
            "home" => composer.move_home(),
            "end" => composer.move_end(),
            other => {
                let mut chars = other.chars();
                if let (Some(ch), None) = (chars.next(), chars.next()) {
                    if !key.ctrl {
                        composer.insert(ch);
                    }
                }
            }
        }
    }
}

impl<H, E> ChatEventHandler for DefaultShellOrchestrator<H, E>
where
    H: HistoryRequester,
    E: MessageEmitter,
{
    fn on_select(&mut self, username: &str) {
        if !self.state.users_mut().select(username) {
            tracing::debug!(username, "ignoring selection of unknown user");
            return;
        }

        self.state.session_mut().set_active_recipient(username);
        self.state.show_chat_panel();
        self.state.messages_mut().begin_loading(username);

        let ticket = self.last_ticket.next();
        self.last_ticket = ticket;
        self.awaited_ticket = Some(ticket);
        tracing::info!(peer = username, ticket = ticket.value(), "opening conversation");
        self.history.request(ticket, username);

        self.state.focus(ActivePane::Composer);
    }

    fn on_message(&mut self, message: InboundMessage) {
        let session = self.state.session();

        if session.is_active_conversation(&message.sender, &message.recipient) {
            let origin = session.origin_of(&message.sender);
            self.state
                .messages_mut()
                .append(Message::new(message.sender, message.body), origin);
        } else if session.is_current_user(&message.recipient) {
            let flagged = self.state.users_mut().mark_unread(&message.sender);
            tracing::debug!(
                sender = %message.sender,
                flagged,
                "message for an inactive conversation"
            );
        }
    }

    fn on_presence(&mut self, online: &[String]) {
        tracing::debug!(online = online.len(), "presence update");
        self.state.users_mut().apply_presence(online);
    }

    fn on_send(&mut self) -> SendOutcome {
        let recipient = self
            .state
            .session()
            .active_recipient()
            .map(ToOwned::to_owned);
        let text = self.state.composer().text().to_owned();

        match send_message(&self.emitter, recipient.as_deref(), &text) {
            Ok(()) => {
                tracing::debug!(
                    recipient = recipient.as_deref().unwrap_or_default(),
                    chars = text.chars().count(),
                    "private message emitted"
                );
                self.state.composer_mut().clear();
                self.state.clear_notice();
                SendOutcome::Sent
            }
            Err(SendMessageError::EmptyMessage | SendMessageError::NoRecipient) => {
                SendOutcome::Skipped
            }
            Err(SendMessageError::Disconnected) => {
                tracing::warn!(code = SEND_FAILED, "socket is closed; message kept in composer");
                self.state.set_notice(SEND_DISCONNECTED_NOTICE);
                SendOutcome::Failed
            }
        }
    }
}

impl<H, E> ShellOrchestrator for DefaultShellOrchestrator<H, E>
where
    H: HistoryRequester,
    E: MessageEmitter,
{
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ShellState {
        &mut self.state
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick => {}
            AppEvent::QuitRequested => self.state.stop(),
            AppEvent::InputKey(key) => self.handle_key(key),
            AppEvent::ConnectivityChanged(status) => {
                self.state.set_connectivity_status(status);
            }
            AppEvent::MessageReceived(message) => self.on_message(message),
            AppEvent::PresenceChanged(online) => self.on_presence(&online),
            AppEvent::HistoryLoaded(outcome) => self.on_history_loaded(outcome),
        }

        Ok(())
    }
}
