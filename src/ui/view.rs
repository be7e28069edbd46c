use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::domain::{
    message_pane_state::MessagePaneUiState,
    shell_state::{ActivePane, Panel, ShellState},
    user_list_state::{UserEntry, UserListState},
};

use super::composer::render_composer;
use super::message_rendering::{build_message_rows, build_notice_rows};
use super::styles;

const PLACEHOLDER_TEXT: &str = "No messages yet. Start the conversation!";
const LOADING_TEXT: &str = "Loading messages...";
const ONLINE_INDICATOR: &str = "\u{25CF}";
const OFFLINE_INDICATOR: &str = "\u{25CB}";
const UNREAD_MARKER: &str = " [new]";

pub fn render(frame: &mut Frame<'_>, state: &mut ShellState) {
    let [content_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .areas(frame.area());

    let [users_area, right_area] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .areas(content_area);

    let active_pane = state.active_pane();
    render_user_list_panel(frame, users_area, state.users(), active_pane);

    match state.panel() {
        Panel::Welcome => render_welcome_panel(frame, right_area, state),
        Panel::Chat => {
            // 3 lines for the composer: border + text + border
            let [messages_area, composer_area] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(3)])
                .areas(right_area);

            render_messages_panel(frame, messages_area, state, active_pane);
            render_composer(frame, composer_area, state.composer(), active_pane);
        }
    }

    frame.render_widget(Paragraph::new(status_line(state)), status_area);
}

fn border_style(is_active: bool) -> Style {
    if is_active {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    }
}

fn render_user_list_panel(
    frame: &mut Frame<'_>,
    area: Rect,
    users: &UserListState,
    active_pane: ActivePane,
) {
    let is_active = active_pane == ActivePane::UserList;
    let block = Block::default()
        .title(format!("Users ({})", users.entries().len()))
        .borders(Borders::ALL)
        .border_style(border_style(is_active));

    if users.is_empty() {
        let panel = Paragraph::new("No other users yet")
            .style(styles::pane_hint_style())
            .block(block);
        frame.render_widget(panel, area);
        return;
    }

    let items: Vec<ListItem<'static>> = users
        .entries()
        .iter()
        .map(|entry| ListItem::new(user_entry_line(entry)))
        .collect();

    let list = List::new(items).block(block).highlight_style(if is_active {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    });

    let mut list_state = ListState::default();
    list_state.select(users.cursor());
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn user_entry_line(entry: &UserEntry) -> Line<'static> {
    let (indicator, indicator_style) = if entry.is_online() {
        (ONLINE_INDICATOR, styles::online_indicator_style())
    } else {
        (OFFLINE_INDICATOR, styles::offline_indicator_style())
    };

    let (marker, name_style) = if entry.selected {
        ("> ", styles::selected_user_style())
    } else {
        ("  ", styles::user_name_style())
    };

    let mut spans = vec![
        Span::raw(marker),
        Span::styled(indicator, indicator_style),
        Span::raw(" "),
        Span::styled(entry.username.clone(), name_style),
    ];

    if entry.has_unread {
        spans.push(Span::styled(UNREAD_MARKER, styles::unread_marker_style()));
    }

    Line::from(spans)
}

fn render_welcome_panel(frame: &mut Frame<'_>, area: Rect, state: &ShellState) {
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            format!("Welcome, {}!", state.session().current_username()),
            styles::selected_user_style(),
        )),
        Line::default(),
        Line::from("Select a user on the left to start a private chat."),
    ];

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("pmchat")
                .borders(Borders::ALL)
                .border_style(border_style(false)),
        );
    frame.render_widget(panel, area);
}

fn render_messages_panel(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &mut ShellState,
    active_pane: ActivePane,
) {
    let block = Block::default()
        .title(state.messages().header().unwrap_or_default())
        .borders(Borders::ALL)
        .border_style(border_style(active_pane == ActivePane::Messages));

    let panel = match state.messages().ui_state() {
        MessagePaneUiState::Empty => Paragraph::new(""),
        MessagePaneUiState::Loading => {
            Paragraph::new(LOADING_TEXT).style(styles::pane_hint_style())
        }
        MessagePaneUiState::Placeholder => {
            Paragraph::new(PLACEHOLDER_TEXT).style(styles::pane_hint_style())
        }
        MessagePaneUiState::Ready => conversation(state, area, None),
        MessagePaneUiState::Error(reason) => conversation(state, area, Some(&reason)),
    };

    frame.render_widget(panel.block(block), area);
}

/// Conversation rows, led by the load failure when there is one.
fn conversation(state: &mut ShellState, area: Rect, error: Option<&str>) -> Paragraph<'static> {
    let inner_width = usize::from(area.width.saturating_sub(2));
    let viewport_height = usize::from(area.height.saturating_sub(2));

    let mut rows = error
        .map(|reason| build_notice_rows(reason, inner_width, styles::pane_error_style()))
        .unwrap_or_default();
    rows.extend(build_message_rows(state.messages().lines(), inner_width));

    Paragraph::new(visible_rows(state, rows, viewport_height))
}

/// Bottom-anchored window over `rows`, shifted up by the pane's scroll position.
fn visible_rows(
    state: &mut ShellState,
    rows: Vec<Line<'static>>,
    viewport_height: usize,
) -> Vec<Line<'static>> {
    let max_scroll = rows.len().saturating_sub(viewport_height);
    state.messages_mut().clamp_scroll_back(max_scroll);

    let start = max_scroll - state.messages().scroll_back();
    rows.into_iter().skip(start).take(viewport_height).collect()
}

fn status_line(state: &ShellState) -> Line<'static> {
    let connectivity = state.connectivity_status().as_label();
    let nav_hint = match state.active_pane() {
        ActivePane::UserList => "j/k: navigate | l/Enter: open chat | Tab: next pane | q: quit",
        ActivePane::Messages => "j/k: scroll | i: compose | h/Esc: back to users | q: quit",
        ActivePane::Composer => "Enter: send | Esc: leave input | Ctrl+C: quit",
    };

    let mut spans = Vec::new();
    if let Some(notice) = state.notice() {
        spans.push(Span::styled(format!("{notice} | "), styles::notice_style()));
    }
    spans.push(Span::raw(format!(
        "user: {} | connectivity: {connectivity} | {nav_hint}",
        state.session().current_username()
    )));

    Line::from(spans)
}
