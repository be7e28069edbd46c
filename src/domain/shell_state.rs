use super::{
    composer_state::ComposerState, events::ConnectivityStatus,
    message_pane_state::MessagePaneState, session::SessionContext,
    user_list_state::UserListState,
};

/// Right-hand panel. Flips to `Chat` on the first selection and stays there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Welcome,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    UserList,
    Messages,
    Composer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    running: bool,
    connectivity_status: ConnectivityStatus,
    panel: Panel,
    active_pane: ActivePane,
    session: SessionContext,
    users: UserListState,
    messages: MessagePaneState,
    composer: ComposerState,
    notice: Option<String>,
}

impl ShellState {
    pub fn new(session: SessionContext, users: UserListState) -> Self {
        Self {
            running: true,
            connectivity_status: ConnectivityStatus::Connecting,
            panel: Panel::Welcome,
            active_pane: ActivePane::UserList,
            session,
            users,
            messages: MessagePaneState::default(),
            composer: ComposerState::default(),
            notice: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn connectivity_status(&self) -> ConnectivityStatus {
        self.connectivity_status
    }

    pub fn set_connectivity_status(&mut self, status: ConnectivityStatus) {
        self.connectivity_status = status;
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn show_chat_panel(&mut self) {
        self.panel = Panel::Chat;
    }

    pub fn active_pane(&self) -> ActivePane {
        self.active_pane
    }

    /// Message and composer panes only exist once the chat panel is shown.
    pub fn focus(&mut self, pane: ActivePane) {
        if self.panel == Panel::Welcome && pane != ActivePane::UserList {
            return;
        }
        self.active_pane = pane;
    }

    pub fn cycle_focus(&mut self) {
        let next = match self.active_pane {
            ActivePane::UserList => ActivePane::Messages,
            ActivePane::Messages => ActivePane::Composer,
            ActivePane::Composer => ActivePane::UserList,
        };
        self.focus(next);
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionContext {
        &mut self.session
    }

    pub fn users(&self) -> &UserListState {
        &self.users
    }

    pub fn users_mut(&mut self) -> &mut UserListState {
        &mut self.users
    }

    pub fn messages(&self) -> &MessagePaneState {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut MessagePaneState {
        &mut self.messages
    }

    pub fn composer(&self) -> &ComposerState {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut ComposerState {
        &mut self.composer
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ShellState {
        ShellState::new(
            SessionContext::new("alice"),
            UserListState::new(["bob".to_owned()]),
        )
    }

    #[test]
    fn starts_on_welcome_panel_with_user_list_focus() {
        let state = state();

        assert!(state.is_running());
        assert_eq!(state.panel(), Panel::Welcome);
        assert_eq!(state.active_pane(), ActivePane::UserList);
        assert_eq!(state.connectivity_status(), ConnectivityStatus::Connecting);
    }

    #[test]
    fn welcome_panel_keeps_focus_on_user_list() {
        let mut state = state();

        state.focus(ActivePane::Composer);
        state.cycle_focus();

        assert_eq!(state.active_pane(), ActivePane::UserList);
    }

    #[test]
    fn chat_panel_is_one_way_and_unlocks_focus() {
        let mut state = state();
        state.show_chat_panel();
        state.show_chat_panel();

        state.cycle_focus();
        assert_eq!(state.active_pane(), ActivePane::Messages);
        state.cycle_focus();
        assert_eq!(state.active_pane(), ActivePane::Composer);
        state.cycle_focus();
        assert_eq!(state.active_pane(), ActivePane::UserList);
        assert_eq!(state.panel(), Panel::Chat);
    }

    #[test]
    fn notice_can_be_set_and_cleared() {
        let mut state = state();

        state.set_notice("not connected");
        assert_eq!(state.notice(), Some("not connected"));

        state.clear_notice();
        assert_eq!(state.notice(), None);
    }
}
