//! Grouped agent listing pane.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::{App, Focus, ListingRow};
use crate::theme::{SwitchboardTheme, get_theme};

/// Render the agent listing with one header row per group.
pub fn render_listing(frame: &mut Frame, area: Rect, app: &App) {
    let theme = get_theme();
    let focused = app.focus == Focus::Listing && app.editor.is_none();

    let border_style = if focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" Agents ({}) ", app.agents.len()));

    if let Some(error) = &app.load_error {
        let text = format!("Failed to load agents.\n\n{error}\n\nPress r to retry.");
        let widget = Paragraph::new(text)
            .style(Style::default().fg(theme.error))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(widget, area);
        return;
    }

    if app.rows.is_empty() {
        let widget = Paragraph::new("No agents yet. Press n to create one.")
            .style(Style::default().fg(theme.text_muted))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(widget, area);
        return;
    }

    let visible = area.height.saturating_sub(2) as usize;
    let first = scroll_offset(app.selected_row, app.rows.len(), visible);
    let last = (first + visible).min(app.rows.len());

    let items: Vec<ListItem> = app.rows[first..last]
        .iter()
        .enumerate()
        .map(|(offset, row)| listing_item(app, row, first + offset == app.selected_row, &theme))
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

fn listing_item(
    app: &App,
    row: &ListingRow,
    selected: bool,
    theme: &SwitchboardTheme,
) -> ListItem<'static> {
    match row {
        ListingRow::Group { label, count } => {
            let style = Style::default()
                .fg(theme.secondary)
                .add_modifier(Modifier::BOLD);
            ListItem::new(Line::from(Span::styled(format!("▸ {label} ({count})"), style)))
        }
        ListingRow::Agent { index } => {
            let Some(agent) = app.agents.get(*index) else {
                return ListItem::new(Line::default());
            };

            let status = if agent.is_active {
                "● Active"
            } else {
                "○ Inactive"
            };
            let running = if app.running.contains(&agent.id) {
                "  ▶ running"
            } else {
                ""
            };
            let text = format!(
                "  {}  [{}]  {}  {}{}",
                agent.name,
                agent.agent_type,
                agent.command_line(),
                status,
                running
            );

            let style = if selected {
                Style::default()
                    .fg(theme.bg_primary)
                    .bg(theme.primary)
                    .add_modifier(Modifier::BOLD)
            } else if agent.is_active {
                Style::default().fg(theme.text)
            } else {
                Style::default().fg(theme.text_muted)
            };
            ListItem::new(Line::from(Span::styled(text, style)))
        }
    }
}

/// First visible row, keeping the selection near the middle of the
/// window once the list overflows.
fn scroll_offset(selected: usize, total: usize, visible: usize) -> usize {
    if visible == 0 || total <= visible {
        return 0;
    }
    let max_first = total - visible;
    selected.saturating_sub(visible / 2).min(max_first)
}

#[cfg(test)]
mod tests {
    use super::scroll_offset;

    #[test]
    fn test_scroll_offset_short_list_stays_at_top() {
        assert_eq!(scroll_offset(3, 5, 10), 0);
    }

    #[test]
    fn test_scroll_offset_clamps_at_end() {
        assert_eq!(scroll_offset(19, 20, 8), 12);
        assert_eq!(scroll_offset(10, 20, 8), 6);
    }
}
