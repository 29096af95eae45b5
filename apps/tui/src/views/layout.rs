//! Screen partitioning for the console.
//!
//! Every frame is cut into a two-line header, a flexible body and a
//! one-line footer. The body holds the directory listing next to the
//! chat pane, or the form editor when one is open.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    prelude::*,
    widgets::Paragraph,
};

/// Cuts the frame into header, body and footer rows.
pub fn split_screen(area: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area)
}

/// Cuts the body into the directory listing and the chat pane.
pub fn split_body(area: Rect) -> [Rect; 2] {
    Layout::horizontal([Constraint::Ratio(1, 3), Constraint::Fill(1)]).areas(area)
}

/// Renders the footer hint line.
pub fn render_footer(frame: &mut Frame, area: Rect, hints: &str) {
    let theme = crate::theme::get_theme();
    let footer = Paragraph::new(hints).style(Style::default().fg(theme.text_muted));
    frame.render_widget(footer, area);
}
