use super::message::{Message, MessageOrigin};

/// What the message pane currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePaneUiState {
    /// No conversation opened yet.
    Empty,
    /// History requested, not rendered yet.
    Loading,
    /// History rendered and empty.
    Placeholder,
    /// History rendered; `lines()` holds the conversation.
    Ready,
    /// History failed; live messages still collect in `lines()` below the reason.
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneLine {
    pub message: Message,
    pub origin: MessageOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePaneState {
    peer: Option<String>,
    lines: Vec<PaneLine>,
    /// Live messages that arrived while the history was loading.
    pending: Vec<PaneLine>,
    ui_state: MessagePaneUiState,
    /// Rows scrolled up from the bottom; 0 follows new messages.
    scroll_back: usize,
}

impl Default for MessagePaneState {
    fn default() -> Self {
        Self {
            peer: None,
            lines: Vec::new(),
            pending: Vec::new(),
            ui_state: MessagePaneUiState::Empty,
            scroll_back: 0,
        }
    }
}

impl MessagePaneState {
    pub fn header(&self) -> Option<String> {
        self.peer.as_deref().map(|peer| format!("Chat with {peer}"))
    }

    pub fn lines(&self) -> &[PaneLine] {
        &self.lines
    }

    pub fn ui_state(&self) -> MessagePaneUiState {
        self.ui_state.clone()
    }

    pub fn scroll_back(&self) -> usize {
        self.scroll_back
    }

    /// Clears the pane for a newly selected conversation.
    pub fn begin_loading(&mut self, peer: impl Into<String>) {
        self.peer = Some(peer.into());
        self.lines.clear();
        self.pending.clear();
        self.ui_state = MessagePaneUiState::Loading;
        self.scroll_back = 0;
    }

    /// Replaces the pane content with `history`, then replays pending live messages
    /// that the history does not already end with.
    pub fn render_history(&mut self, history: Vec<Message>, current_username: &str) {
        let pending = std::mem::take(&mut self.pending);
        let overlap = history_overlap(&history, &pending);

        self.lines = history
            .into_iter()
            .map(|message| PaneLine {
                origin: MessageOrigin::classify(&message.sender, current_username),
                message,
            })
            .collect();
        self.lines.extend(pending.into_iter().skip(overlap));

        self.ui_state = if self.lines.is_empty() {
            MessagePaneUiState::Placeholder
        } else {
            MessagePaneUiState::Ready
        };
        self.scroll_back = 0;
    }

    pub fn set_error(&mut self, reason: impl Into<String>) {
        self.lines.clear();
        self.pending.clear();
        self.ui_state = MessagePaneUiState::Error(reason.into());
        self.scroll_back = 0;
    }

    /// Appends a live message. While loading it is held until the history lands.
    pub fn append(&mut self, message: Message, origin: MessageOrigin) {
        let line = PaneLine { message, origin };

        match self.ui_state {
            MessagePaneUiState::Loading => {
                self.pending.push(line);
                return;
            }
            MessagePaneUiState::Error(_) => {}
            _ => self.ui_state = MessagePaneUiState::Ready,
        }

        self.lines.push(line);
        self.scroll_back = 0;
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll_back = self.scroll_back.saturating_add(rows);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(rows);
    }

    /// Caps the scroll position once the renderer knows how many rows exist.
    pub fn clamp_scroll_back(&mut self, max: usize) {
        self.scroll_back = self.scroll_back.min(max);
    }
}

/// Length of the longest history suffix equal to a prefix of `pending`.
/// Compares sender and body only; live messages have no timestamp.
fn history_overlap(history: &[Message], pending: &[PaneLine]) -> usize {
    let max = history.len().min(pending.len());

    (1..=max)
        .rev()
        .find(|&len| {
            history[history.len() - len..]
                .iter()
                .zip(&pending[..len])
                .all(|(old, live)| old.same_content(&live.message))
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(sender: &str, body: &str) -> Message {
        Message::new(sender, body)
    }

    fn bodies(state: &MessagePaneState) -> Vec<&str> {
        state
            .lines()
            .iter()
            .map(|line| line.message.body.as_str())
            .collect()
    }

    #[test]
    fn default_pane_is_empty_without_header() {
        let state = MessagePaneState::default();

        assert_eq!(state.ui_state(), MessagePaneUiState::Empty);
        assert_eq!(state.header(), None);
        assert!(state.lines().is_empty());
    }

    #[test]
    fn begin_loading_clears_previous_conversation() {
        let mut state = MessagePaneState::default();
        state.begin_loading("bob");
        state.render_history(vec![msg("bob", "hi")], "alice");
        state.scroll_up(3);

        state.begin_loading("carol");

        assert_eq!(state.ui_state(), MessagePaneUiState::Loading);
        assert_eq!(state.header().as_deref(), Some("Chat with carol"));
        assert!(state.lines().is_empty());
        assert_eq!(state.scroll_back(), 0);
    }

    #[test]
    fn empty_history_renders_placeholder() {
        let mut state = MessagePaneState::default();
        state.begin_loading("bob");

        state.render_history(vec![], "alice");

        assert_eq!(state.ui_state(), MessagePaneUiState::Placeholder);
        assert!(state.lines().is_empty());
    }

    #[test]
    fn history_lines_are_tagged_by_sender() {
        let mut state = MessagePaneState::default();
        state.begin_loading("bob");

        state.render_history(vec![msg("bob", "hi"), msg("alice", "hey")], "alice");

        assert_eq!(state.ui_state(), MessagePaneUiState::Ready);
        let origins: Vec<_> = state.lines().iter().map(|line| line.origin).collect();
        assert_eq!(origins, [MessageOrigin::Other, MessageOrigin::Mine]);
    }

    #[test]
    fn render_history_scrolls_to_bottom() {
        let mut state = MessagePaneState::default();
        state.begin_loading("bob");
        state.scroll_up(4);

        state.render_history(vec![msg("bob", "hi")], "alice");

        assert_eq!(state.scroll_back(), 0);
    }

    #[test]
    fn live_message_after_history_is_appended_in_order() {
        let mut state = MessagePaneState::default();
        state.begin_loading("bob");
        state.render_history(vec![], "alice");

        state.append(msg("bob", "one"), MessageOrigin::Other);
        state.append(msg("alice", "two"), MessageOrigin::Mine);

        assert_eq!(state.ui_state(), MessagePaneUiState::Ready);
        assert_eq!(bodies(&state), ["one", "two"]);
    }

    #[test]
    fn live_message_during_loading_survives_history_render() {
        let mut state = MessagePaneState::default();
        state.begin_loading("bob");

        state.append(msg("bob", "fresh"), MessageOrigin::Other);
        assert!(state.lines().is_empty());

        state.render_history(vec![msg("bob", "old")], "alice");

        assert_eq!(bodies(&state), ["old", "fresh"]);
    }

    #[test]
    fn pending_message_already_in_history_is_not_duplicated() {
        let mut state = MessagePaneState::default();
        state.begin_loading("bob");
        state.append(msg("bob", "b"), MessageOrigin::Other);
        state.append(msg("bob", "c"), MessageOrigin::Other);

        state.render_history(vec![msg("bob", "a"), msg("bob", "b")], "alice");

        assert_eq!(bodies(&state), ["a", "b", "c"]);
    }

    #[test]
    fn pending_message_equal_to_history_tail_is_collapsed() {
        // Live messages carry no timestamp, so a repeat of the last history
        // line is indistinguishable from the stored copy.
        let mut state = MessagePaneState::default();
        state.begin_loading("bob");
        state.append(msg("alice", "ok"), MessageOrigin::Mine);

        state.render_history(vec![msg("bob", "ready?"), msg("alice", "ok")], "alice");

        assert_eq!(bodies(&state), ["ready?", "ok"]);
    }

    #[test]
    fn error_replaces_content() {
        let mut state = MessagePaneState::default();
        state.begin_loading("bob");
        state.append(msg("bob", "pending"), MessageOrigin::Other);

        state.set_error("Failed to load messages: Not Found");

        assert_eq!(
            state.ui_state(),
            MessagePaneUiState::Error("Failed to load messages: Not Found".to_owned())
        );
        assert!(state.lines().is_empty());
    }

    #[test]
    fn live_message_after_error_keeps_the_reason_visible() {
        let mut state = MessagePaneState::default();
        state.begin_loading("bob");
        state.set_error("Failed to load messages: Not Found");

        state.append(msg("bob", "still here"), MessageOrigin::Other);

        assert_eq!(
            state.ui_state(),
            MessagePaneUiState::Error("Failed to load messages: Not Found".to_owned())
        );
        assert_eq!(bodies(&state), ["still here"]);
    }

    #[test]
    fn scrolling_is_clamped_and_reset_by_new_messages() {
        let mut state = MessagePaneState::default();
        state.begin_loading("bob");
        state.render_history(vec![msg("bob", "hi")], "alice");

        state.scroll_up(10);
        state.clamp_scroll_back(2);
        assert_eq!(state.scroll_back(), 2);

        state.scroll_down(1);
        assert_eq!(state.scroll_back(), 1);

        state.append(msg("bob", "again"), MessageOrigin::Other);
        assert_eq!(state.scroll_back(), 0);
    }
}
