//! Chat pane: message timeline, input line, and mention popup.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use switchboard_core::{ChatMessage, ChatRole};

use crate::app::{App, Focus};
use crate::components::render_mention_popup;
use crate::theme::{SwitchboardTheme, get_theme};

/// Render the chat pane: timeline above, input line below.
pub fn render_chat(frame: &mut Frame, area: Rect, app: &App) {
    let theme = get_theme();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(area);

    render_timeline(frame, chunks[0], app, &theme);
    render_input(frame, chunks[1], app, &theme);
    render_mention_popup(frame, chunks[1], &app.mention);
}

fn render_timeline(frame: &mut Frame, area: Rect, app: &App, theme: &SwitchboardTheme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(" Chat ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let width = inner.width as usize;
    let messages = app.session.messages();
    let start = messages.len().saturating_sub(app.max_messages);

    let mut lines: Vec<Line> = Vec::new();
    for message in &messages[start..] {
        push_message_lines(&mut lines, message, app, width, theme);
    }
    // Drop the trailing spacer so the last message hugs the input.
    lines.pop();

    // Bottom anchored: show the most recent lines that fit.
    let height = inner.height as usize;
    let tail = lines.split_off(lines.len().saturating_sub(height));
    frame.render_widget(Paragraph::new(tail), inner);
}

fn push_message_lines(
    lines: &mut Vec<Line<'static>>,
    message: &ChatMessage,
    app: &App,
    width: usize,
    theme: &SwitchboardTheme,
) {
    let (prefix, prefix_style, content_style) = match message.role {
        ChatRole::User => (
            "You: ".to_string(),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(theme.text),
        ),
        ChatRole::Assistant => {
            let name = app
                .session
                .active_agent()
                .map_or_else(|| "Agent".to_string(), |a| a.name.clone());
            (
                format!("{name}: "),
                Style::default()
                    .fg(theme.success)
                    .add_modifier(Modifier::BOLD),
                Style::default().fg(theme.text),
            )
        }
        ChatRole::System => (
            String::new(),
            Style::default(),
            Style::default()
                .fg(theme.text_dim)
                .add_modifier(Modifier::ITALIC),
        ),
    };

    let prefix_width = prefix.chars().count();
    let budget = width.saturating_sub(prefix_width).max(1);
    let indent = " ".repeat(prefix_width);

    let mut first = true;
    for raw in message.content.split('\n') {
        for piece in textwrap::wrap(raw, budget) {
            if first {
                lines.push(Line::from(vec![
                    Span::styled(prefix.clone(), prefix_style),
                    Span::styled(piece.into_owned(), content_style),
                ]));
                first = false;
            } else {
                lines.push(Line::from(vec![
                    Span::raw(indent.clone()),
                    Span::styled(piece.into_owned(), content_style),
                ]));
            }
        }
    }
    lines.push(Line::default());
}

fn render_input(frame: &mut Frame, area: Rect, app: &App, theme: &SwitchboardTheme) {
    let focused = app.focus == Focus::Chat && app.editor.is_none();
    let border_style = if focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut spans = vec![Span::styled("> ", Style::default().fg(theme.primary))];

    if app.chat_input.is_empty() && !focused {
        spans.push(Span::styled(
            "Type @ to mention an agent",
            Style::default().fg(theme.text_dim),
        ));
    } else {
        let width = area.width.saturating_sub(4).max(1) as usize;
        let (window, cursor) =
            input_window(app.chat_input.value(), app.chat_input.cursor(), width);
        let chars: Vec<char> = window.chars().collect();
        let text_style = Style::default().fg(theme.text);

        let before: String = chars[..cursor].iter().collect();
        spans.push(Span::styled(before, text_style));
        if focused {
            if cursor < chars.len() {
                spans.push(Span::styled(
                    chars[cursor].to_string(),
                    text_style.add_modifier(Modifier::REVERSED),
                ));
                let after: String = chars[cursor + 1..].iter().collect();
                spans.push(Span::styled(after, text_style));
            } else {
                spans.push(Span::styled("_", Style::default().fg(theme.primary)));
            }
        } else {
            let after: String = chars[cursor..].iter().collect();
            spans.push(Span::styled(after, text_style));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Slice `value` so the cursor stays visible within `width` columns.
/// Returns the visible slice and the cursor position within it.
fn input_window(value: &str, cursor: usize, width: usize) -> (String, usize) {
    use unicode_width::UnicodeWidthChar;

    let chars: Vec<char> = value.chars().collect();
    let cursor = cursor.min(chars.len());
    if width == 0 {
        return (String::new(), 0);
    }

    let col = |c: char| UnicodeWidthChar::width(c).unwrap_or(1).max(1);

    // Walk back from the cursor, reserving one column for the cursor
    // cell itself.
    let mut start = cursor;
    let mut used = 1usize;
    while start > 0 && used + col(chars[start - 1]) <= width {
        used += col(chars[start - 1]);
        start -= 1;
    }

    // Fill the remaining columns with text at and after the cursor.
    let mut total = used - 1;
    let mut end = cursor;
    while end < chars.len() && total + col(chars[end]) <= width {
        total += col(chars[end]);
        end += 1;
    }

    (chars[start..end].iter().collect(), cursor - start)
}
