//! Message pane rendering logic.
//!
//! Each message becomes one or more rows:
//! - `HH:MM` time column (blank for live messages, which carry no timestamp)
//! - bold `sender:` label, coloured by whether the current user sent it
//! - body text wrapped to the pane width, continuation rows indented under the time column

use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::{message::MessageOrigin, message_pane_state::PaneLine};

use super::styles;

/// "HH:MM" plus one space.
const TIME_COLUMN_WIDTH: usize = 6;

/// Builds every visual row of the conversation, oldest first.
pub fn build_message_rows(lines: &[PaneLine], width: usize) -> Vec<Line<'static>> {
    lines
        .iter()
        .flat_map(|line| message_rows(line, width))
        .collect()
}

/// Wraps a pane notice (such as a load failure) into rows of the given style.
pub fn build_notice_rows(text: &str, width: usize, style: Style) -> Vec<Line<'static>> {
    wrap_body(text, width, width)
        .into_iter()
        .map(|row| Line::from(Span::styled(row, style)))
        .collect()
}

fn message_rows(line: &PaneLine, width: usize) -> Vec<Line<'static>> {
    let time = line
        .message
        .display_time()
        .map(|time| format!("{time:>5} "))
        .unwrap_or_else(|| " ".repeat(TIME_COLUMN_WIDTH));
    let sender = format!("{}: ", line.message.sender);
    let sender_style = match line.origin {
        MessageOrigin::Mine => styles::own_sender_style(),
        MessageOrigin::Other => styles::other_sender_style(),
    };

    let first_width = width.saturating_sub(TIME_COLUMN_WIDTH + sender.width());
    let rest_width = width.saturating_sub(TIME_COLUMN_WIDTH);
    let mut body_rows = wrap_body(&line.message.body, first_width, rest_width).into_iter();

    let mut rows = vec![Line::from(vec![
        Span::styled(time, styles::message_time_style()),
        Span::styled(sender, sender_style),
        Span::styled(body_rows.next().unwrap_or_default(), styles::message_text_style()),
    ])];

    for body in body_rows {
        rows.push(Line::from(vec![
            Span::raw(" ".repeat(TIME_COLUMN_WIDTH)),
            Span::styled(body, styles::message_text_style()),
        ]));
    }

    rows
}

/// Splits `body` into rows: the first holds at most `first_width` columns, the
/// rest `rest_width`. Explicit newlines always start a new row.
fn wrap_body(body: &str, first_width: usize, rest_width: usize) -> Vec<String> {
    let mut rows = vec![String::new()];
    let mut used = 0;
    let mut limit = first_width;
    let mut on_first_row = true;

    for ch in body.chars() {
        if ch == '\n' {
            rows.push(String::new());
            used = 0;
            limit = rest_width;
            on_first_row = false;
            continue;
        }

        let ch_width = ch.width().unwrap_or(0);
        // An empty continuation row takes the character even if it is too wide.
        if used + ch_width > limit && (used > 0 || on_first_row) {
            rows.push(String::new());
            used = 0;
            limit = rest_width;
            on_first_row = false;
        }

        if let Some(row) = rows.last_mut() {
            row.push(ch);
        }
        used += ch_width;
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::message::Message;

    fn pane_line(message: Message, origin: MessageOrigin) -> PaneLine {
        PaneLine { message, origin }
    }

    fn line_to_string(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn history_line_shows_time_sender_and_body() {
        let rows = build_message_rows(
            &[pane_line(
                Message::new("bob", "hi").with_sent_at("2024-05-01 13:07:45"),
                MessageOrigin::Other,
            )],
            40,
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(line_to_string(&rows[0]), "13:07 bob: hi");
        assert_eq!(rows[0].spans[1].style, styles::other_sender_style());
    }

    #[test]
    fn live_line_has_blank_time_column_and_own_style() {
        let rows = build_message_rows(
            &[pane_line(Message::new("alice", "yo"), MessageOrigin::Mine)],
            40,
        );

        assert_eq!(line_to_string(&rows[0]), "      alice: yo");
        assert_eq!(rows[0].spans[1].style, styles::own_sender_style());
    }

    #[test]
    fn long_bodies_wrap_under_the_time_column() {
        let rows = build_message_rows(
            &[pane_line(
                Message::new("bob", "abcdefghijklmnop"),
                MessageOrigin::Other,
            )],
            20,
        );

        let text: Vec<String> = rows.iter().map(line_to_string).collect();
        assert_eq!(text, ["      bob: abcdefghi", "      jklmnop"]);
    }

    #[test]
    fn newlines_start_new_rows() {
        assert_eq!(wrap_body("one\ntwo", 10, 10), ["one", "two"]);
        assert_eq!(wrap_body("", 10, 10), [""]);
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(wrap_body("日本語", 4, 4), ["日本", "語"]);
    }

    #[test]
    fn no_room_on_first_row_moves_body_down() {
        assert_eq!(wrap_body("ab", 0, 5), ["", "ab"]);
        assert_eq!(wrap_body("日", 0, 1), ["", "日"]);
    }
}
