//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// Panel styles
// =============================================================================

/// Border of the pane that owns keyboard focus.
pub fn active_panel_border_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn inactive_panel_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

// =============================================================================
// User list styles
// =============================================================================

pub fn user_name_style() -> Style {
    Style::default().fg(Color::White)
}

/// The user whose conversation is open.
pub fn selected_user_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn online_indicator_style() -> Style {
    Style::default().fg(Color::Green)
}

pub fn offline_indicator_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Marker for users with messages the current user has not seen.
pub fn unread_marker_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

// =============================================================================
// Message pane styles
// =============================================================================

pub fn message_time_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Sender label on the current user's own messages.
pub fn own_sender_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

pub fn other_sender_style() -> Style {
    Style::default()
        .fg(Color::Blue)
        .add_modifier(Modifier::BOLD)
}

pub fn message_text_style() -> Style {
    Style::default().fg(Color::White)
}

/// Loading text and the empty-conversation placeholder.
pub fn pane_hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn pane_error_style() -> Style {
    Style::default().fg(Color::Red)
}

// =============================================================================
// Composer and status line styles
// =============================================================================

pub fn input_prompt_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn input_placeholder_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn notice_style() -> Style {
    Style::default().fg(Color::Yellow)
}
