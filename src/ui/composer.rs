//! Composer field rendering.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{
    composer_state::{ComposerState, MAX_MESSAGE_CHARS},
    shell_state::ActivePane,
};

use super::styles;

/// Placeholder text shown when the composer is not focused and empty.
const PLACEHOLDER_TEXT: &str = "Press 'i' to type a message...";

/// Prompt symbol shown before the input text.
const PROMPT_SYMBOL: &str = "> ";

pub fn render_composer(
    frame: &mut Frame<'_>,
    area: Rect,
    composer: &ComposerState,
    active_pane: ActivePane,
) {
    let is_focused = active_pane == ActivePane::Composer;

    let border_style = if is_focused {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    };

    let inner_width = usize::from(area.width.saturating_sub(2)).max(1);
    let cursor_offset = PROMPT_SYMBOL.len() + composer.cursor_column();
    // Keep the cursor inside the field by scrolling the text horizontally.
    let scroll_x = (cursor_offset + 1).saturating_sub(inner_width);

    let paragraph = Paragraph::new(build_input_line(composer, is_focused))
        .scroll((0, clamp_to_u16(scroll_x)))
        .block(
            Block::default()
                .title(counter_title(composer))
                .borders(Borders::ALL)
                .border_style(border_style),
        );

    frame.render_widget(paragraph, area);

    if is_focused {
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(clamp_to_u16(cursor_offset.saturating_sub(scroll_x)));
        let cursor_y = area.y.saturating_add(1);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

fn clamp_to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Character count against the limit, shown once the user starts typing.
fn counter_title(composer: &ComposerState) -> String {
    let used = composer.text().chars().count();
    if used == 0 {
        String::new()
    } else {
        format!("{used}/{MAX_MESSAGE_CHARS}")
    }
}

fn build_input_line(composer: &ComposerState, is_focused: bool) -> Line<'static> {
    let prompt = Span::styled(PROMPT_SYMBOL.to_owned(), styles::input_prompt_style());

    if !is_focused && composer.text().is_empty() {
        Line::from(vec![
            prompt,
            Span::styled(
                PLACEHOLDER_TEXT.to_owned(),
                styles::input_placeholder_style(),
            ),
        ])
    } else {
        Line::from(vec![
            prompt,
            Span::styled(composer.text().to_owned(), styles::input_text_style()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn composer_with(text: &str) -> ComposerState {
        let mut composer = ComposerState::default();
        for ch in text.chars() {
            composer.insert(ch);
        }
        composer
    }

    #[test]
    fn shows_placeholder_when_empty_and_unfocused() {
        let text = line_text(&build_input_line(&ComposerState::default(), false));

        assert!(text.contains(PLACEHOLDER_TEXT));
        assert!(text.starts_with(PROMPT_SYMBOL));
    }

    #[test]
    fn shows_bare_prompt_when_focused_and_empty() {
        let text = line_text(&build_input_line(&ComposerState::default(), true));

        assert_eq!(text, PROMPT_SYMBOL);
    }

    #[test]
    fn keeps_draft_visible_when_unfocused() {
        let text = line_text(&build_input_line(&composer_with("Hi"), false));

        assert_eq!(text, "> Hi");
    }

    #[test]
    fn counter_appears_once_typing_starts() {
        assert_eq!(counter_title(&ComposerState::default()), "");
        assert_eq!(counter_title(&composer_with("hey")), "3/500");
    }
}
