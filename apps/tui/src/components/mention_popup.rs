//! Mention completion popup anchored above the chat input.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};
use switchboard_core::MentionState;

/// Renders the mention candidate popup above `input_area` while a
/// mention token is active. Hidden when there are no candidates.
pub fn render_mention_popup(frame: &mut Frame, input_area: Rect, mention: &MentionState) {
    let candidates = mention.candidates();
    if !mention.is_active() || candidates.is_empty() {
        return;
    }

    let theme = crate::theme::get_theme();

    let shown = candidates.len().min(8);
    // Slide the window down once the highlight walks past its bottom.
    let first = (mention.selected_index() + 1).saturating_sub(shown);
    let visible = &candidates[first..first + shown];
    let popup_height = (shown + 3) as u16;
    let popup_width = visible
        .iter()
        .map(|c| c.name.len() + c.agent_type.len() + 8)
        .max()
        .unwrap_or(20)
        .max(24)
        .min(input_area.width.saturating_sub(4) as usize) as u16;

    let popup_area = Rect {
        x: input_area.x + 2,
        y: input_area.y.saturating_sub(popup_height),
        width: popup_width,
        height: popup_height,
    };

    let mut lines = vec![Line::from(Span::styled(
        format!("@{}", mention.query()),
        Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD),
    ))];

    for (i, candidate) in visible.iter().enumerate() {
        let is_selected = first + i == mention.selected_index();
        let prefix = if is_selected { "▶ " } else { "  " };
        let style = if is_selected {
            Style::default()
                .fg(theme.bg_primary)
                .bg(theme.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{prefix}{}", candidate.name), style),
            Span::styled(
                format!("  ({})", candidate.agent_type),
                if is_selected {
                    style
                } else {
                    Style::default().fg(theme.text_muted)
                },
            ),
        ]));
    }

    lines.push(Line::from(Span::styled(
        "↑↓ Navigate | Tab/Enter Select | Esc Cancel",
        Style::default().fg(theme.text_dim),
    )));

    frame.render_widget(Clear, popup_area);
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .style(Style::default().bg(theme.bg_panel)),
    );
    frame.render_widget(widget, popup_area);
}
