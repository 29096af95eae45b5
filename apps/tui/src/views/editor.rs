//! Agent form editor: batch creation tabs plus per-field editing.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{EditorUi, FormField};
use crate::theme::{SwitchboardTheme, get_theme};

const FIELD_ORDER: [FormField; 6] = [
    FormField::Name,
    FormField::AgentType,
    FormField::Command,
    FormField::Args,
    FormField::Env,
    FormField::Active,
];

/// Render the form editor over the main area.
pub fn render_editor(frame: &mut Frame, area: Rect, ui: &EditorUi) {
    let theme = get_theme();
    let draft = ui.editor.focused();

    let title = if ui.editor.is_editing() {
        let name = if draft.name.is_empty() {
            "agent"
        } else {
            draft.name.as_str()
        };
        format!(" Edit Agent: {name} ")
    } else {
        " Create Agents ".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_active))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ));

    let mut lines: Vec<Line> = Vec::new();

    if !ui.editor.is_editing() {
        lines.push(tab_line(ui, &theme));
        lines.push(Line::default());
    }

    for field in FIELD_ORDER {
        lines.push(field_line(ui, field, &theme));
    }

    let hint = match ui.field {
        FormField::Args => Some("Enter adds the arg, Backspace on empty removes the last"),
        FormField::Env => Some("Enter adds KEY=VALUE, Backspace on empty removes the last"),
        _ => None,
    };
    if let Some(hint) = hint {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(theme.text_dim),
        )));
    }

    if !ui.errors.is_empty() {
        lines.push(Line::default());
        for error in &ui.errors {
            lines.push(Line::from(Span::styled(
                format!("• {error}"),
                Style::default().fg(theme.error),
            )));
        }
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One tab per draft in batch mode.
fn tab_line(ui: &EditorUi, theme: &SwitchboardTheme) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, draft) in ui.editor.drafts().iter().enumerate() {
        let label = if draft.name.is_empty() {
            format!(" Agent {} ", i + 1)
        } else {
            format!(" {} ", draft.name)
        };
        let style = if i == ui.editor.focused_index() {
            Style::default()
                .fg(theme.bg_primary)
                .bg(theme.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_muted)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn field_line(ui: &EditorUi, field: FormField, theme: &SwitchboardTheme) -> Line<'static> {
    let focused = ui.field == field;
    let draft = ui.editor.focused();

    let marker = if focused { "▶ " } else { "  " };
    let label_style = if focused {
        Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_muted)
    };
    let value_style = Style::default().fg(theme.text);

    let mut spans = vec![Span::styled(
        format!("{marker}{:<9}", field.label()),
        label_style,
    )];

    match field {
        FormField::Name | FormField::AgentType | FormField::Command => {
            if focused {
                push_buffer_spans(&mut spans, ui, theme);
            } else {
                let value = match field {
                    FormField::Name => &draft.name,
                    FormField::AgentType => &draft.agent_type,
                    _ => &draft.command,
                };
                spans.push(Span::styled(value.clone(), value_style));
            }
        }
        FormField::Args => {
            spans.push(Span::styled(draft.args.join(" "), value_style));
            if focused {
                push_composer_spans(&mut spans, ui, theme);
            }
        }
        FormField::Env => {
            let entries: Vec<String> = draft
                .env
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            spans.push(Span::styled(entries.join(" "), value_style));
            if focused {
                push_composer_spans(&mut spans, ui, theme);
            }
        }
        FormField::Active => {
            let (mark, style) = if draft.is_active {
                ("[x] enabled", Style::default().fg(theme.success))
            } else {
                ("[ ] disabled", Style::default().fg(theme.text_muted))
            };
            spans.push(Span::styled(mark, style));
            if focused {
                spans.push(Span::styled(
                    "  (Space toggles)",
                    Style::default().fg(theme.text_dim),
                ));
            }
        }
    }

    Line::from(spans)
}

/// Edit buffer with the cursor cell reversed, or a trailing underscore
/// when the cursor sits at the end.
fn push_buffer_spans(spans: &mut Vec<Span<'static>>, ui: &EditorUi, theme: &SwitchboardTheme) {
    let chars: Vec<char> = ui.buffer.value().chars().collect();
    let cursor = ui.buffer.cursor().min(chars.len());
    let style = Style::default().fg(theme.text);

    let before: String = chars[..cursor].iter().collect();
    spans.push(Span::styled(before, style));
    if cursor < chars.len() {
        spans.push(Span::styled(
            chars[cursor].to_string(),
            style.add_modifier(Modifier::REVERSED),
        ));
        let after: String = chars[cursor + 1..].iter().collect();
        spans.push(Span::styled(after, style));
    } else {
        spans.push(Span::styled("_", Style::default().fg(theme.primary)));
    }
}

fn push_composer_spans(spans: &mut Vec<Span<'static>>, ui: &EditorUi, theme: &SwitchboardTheme) {
    spans.push(Span::styled("  › ", Style::default().fg(theme.info)));
    push_buffer_spans(spans, ui, theme);
}
