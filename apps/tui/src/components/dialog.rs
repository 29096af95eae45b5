//! Modal confirmation prompt.
//!
//! The app shows one dialog at a time; keys route through
//! `DialogManager::handle_key` until the user confirms or cancels.

use crossterm::event::KeyCode;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Padding, Paragraph},
};

use crate::theme::SwitchboardTheme;

/// One selectable row in a dialog.
#[derive(Debug, Clone)]
pub struct DialogChoice {
    pub title: String,
    /// Handed back by the manager when this row is confirmed.
    pub value: String,
}

impl DialogChoice {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
        }
    }
}

/// A prompt with a cursor over its choices. The first choice starts
/// selected.
#[derive(Debug, Clone)]
pub struct Dialog {
    pub message: String,
    /// Secondary line rendered dimmed under the message.
    pub detail: Option<String>,
    pub choices: Vec<DialogChoice>,
    pub selected_index: usize,
}

impl Dialog {
    pub fn new(message: String, choices: Vec<DialogChoice>) -> Self {
        Self {
            message,
            detail: None,
            choices,
            selected_index: 0,
        }
    }

    /// Adds the dimmed detail line.
    pub fn with_detail(mut self, detail: String) -> Self {
        self.detail = Some(detail);
        self
    }

    fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    fn select_next(&mut self) {
        if self.selected_index + 1 < self.choices.len() {
            self.selected_index += 1;
        }
    }

    /// Row under the cursor.
    pub fn selected(&self) -> Option<&DialogChoice> {
        self.choices.get(self.selected_index)
    }
}

/// Holds the open dialog, if any, and drives it from key events.
#[derive(Debug, Default)]
pub struct DialogManager {
    open: Option<Dialog>,
}

impl DialogManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, dialog: Dialog) {
        self.open = Some(dialog);
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn current(&self) -> Option<&Dialog> {
        self.open.as_ref()
    }

    /// Routes a key to the open dialog. Enter confirms and yields the
    /// selected choice's value; Esc cancels. Both close the dialog.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<String> {
        let dialog = self.open.as_mut()?;
        match key {
            KeyCode::Up => dialog.select_prev(),
            KeyCode::Down => dialog.select_next(),
            KeyCode::Enter => {
                let picked = dialog.selected().map(|choice| choice.value.clone());
                self.close();
                return picked;
            }
            KeyCode::Esc => self.close(),
            _ => {}
        }
        None
    }
}

/// Renders the dialog as a bordered card over the dimmed main area.
pub fn render_dialog(frame: &mut Frame, area: Rect, dialog: &Dialog) {
    let theme = crate::theme::get_theme();

    let mut lines: Vec<Line> = Vec::with_capacity(dialog.choices.len() + 4);
    lines.push(Line::from(Span::styled(
        format!("◆ {}", dialog.message),
        Style::default().fg(theme.primary),
    )));
    if let Some(detail) = &dialog.detail {
        lines.push(Line::from(Span::styled(
            format!("  {detail}"),
            Style::default().fg(theme.text_muted),
        )));
    }
    lines.push(Line::default());
    for (idx, choice) in dialog.choices.iter().enumerate() {
        lines.push(choice_line(choice, idx == dialog.selected_index, &theme));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "↑/↓ Navigate • Enter Confirm • Esc Cancel",
        Style::default().fg(theme.text_dim),
    )));

    let height = (lines.len() as u16 + 2).min(area.height);
    let width = 56u16.min(area.width);
    let card = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 3,
        width,
        height,
    };

    frame.render_widget(Clear, card);
    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .style(Style::default().bg(theme.bg_panel))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(body, card);
}

fn choice_line(choice: &DialogChoice, selected: bool, theme: &SwitchboardTheme) -> Line<'static> {
    if selected {
        Line::from(Span::styled(
            format!("● {}", choice.title),
            Style::default()
                .fg(theme.bg_primary)
                .bg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(
            format!("○ {}", choice.title),
            Style::default().fg(theme.text),
        ))
    }
}
