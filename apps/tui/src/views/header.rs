//! Branded header for the Switchboard TUI.
//!
//! Always-visible line showing the platform name, the backend in use,
//! and the chat connection status.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use switchboard_core::SessionState;

use crate::app::App;

/// Render the branded header.
pub fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let theme = crate::theme::get_theme();

    let mut parts = vec![Span::styled(
        "⬡ Multi MCP Agent Platform",
        Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD),
    )];

    parts.push(Span::raw(" | "));
    parts.push(Span::styled(
        app.base_url.clone(),
        Style::default().fg(theme.text_muted),
    ));

    parts.push(Span::raw(" | "));
    match app.session.state() {
        SessionState::Connected => {
            let agent = app
                .session
                .active_agent()
                .map_or("agent", |a| a.name.as_str());
            parts.push(Span::styled(
                format!("● {agent}"),
                Style::default().fg(theme.success),
            ));
        }
        SessionState::Connecting => {
            parts.push(Span::styled(
                "◌ Connecting...".to_string(),
                Style::default().fg(theme.warning),
            ));
        }
        SessionState::Disconnected => {
            parts.push(Span::styled(
                "○ Disconnected".to_string(),
                Style::default().fg(theme.text_muted),
            ));
        }
    }

    let header = Paragraph::new(Line::from(parts)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(header, area);
}
