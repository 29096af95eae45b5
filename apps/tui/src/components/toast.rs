//! Transient notification overlay.
//!
//! Toasts stack in the top-right corner and expire on their own; the
//! app calls `ToastManager::update` once per tick to drop dead ones.

use std::time::{Duration, Instant};

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::theme::SwitchboardTheme;

/// How long a toast stays on screen.
const TOAST_TTL: Duration = Duration::from_secs(3);
/// Upper bound on stacked toasts; the oldest are dropped first.
const MAX_STACKED: usize = 5;

/// Severity of a toast, controlling its accent color and icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Success,
    Error,
    Info,
    Warning,
}

impl ToastVariant {
    /// Accent color and icon for this severity.
    fn badge(self, theme: &SwitchboardTheme) -> (Color, &'static str) {
        match self {
            Self::Success => (theme.success, "✓"),
            Self::Error => (theme.error, "✗"),
            Self::Info => (theme.info, "ℹ"),
            Self::Warning => (theme.warning, "⚠"),
        }
    }
}

/// One queued notification.
#[derive(Debug, Clone)]
pub struct Toast {
    pub variant: ToastVariant,
    pub message: String,
    expires_at: Instant,
}

impl Toast {
    pub fn new(variant: ToastVariant, message: String) -> Self {
        Self {
            variant,
            message,
            expires_at: Instant::now() + TOAST_TTL,
        }
    }

    fn expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Queue of live toasts, oldest first.
#[derive(Debug, Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: String) {
        self.push(ToastVariant::Success, message);
    }

    pub fn error(&mut self, message: String) {
        self.push(ToastVariant::Error, message);
    }

    pub fn info(&mut self, message: String) {
        self.push(ToastVariant::Info, message);
    }

    pub fn warning(&mut self, message: String) {
        self.push(ToastVariant::Warning, message);
    }

    fn push(&mut self, variant: ToastVariant, message: String) {
        self.toasts.push(Toast::new(variant, message));
        if self.toasts.len() > MAX_STACKED {
            let overflow = self.toasts.len() - MAX_STACKED;
            self.toasts.drain(..overflow);
        }
    }

    /// Drop expired toasts. Called once per tick.
    pub fn update(&mut self) {
        self.toasts.retain(|toast| !toast.expired());
    }

    /// Live toasts, oldest first.
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}

/// Render the toast stack in the top-right corner, newest on top.
pub fn render_toasts(frame: &mut Frame, area: Rect, manager: &ToastManager) {
    if manager.toasts().is_empty() {
        return;
    }
    let theme = crate::theme::get_theme();
    let width = 50u16.min(area.width.saturating_sub(4));
    if width == 0 {
        return;
    }
    let x = area.right().saturating_sub(width + 2);

    let mut y = area.y + 2;
    for toast in manager.toasts().iter().rev() {
        let card = Rect {
            x,
            y,
            width,
            height: 3,
        };
        if card.bottom() + 1 > area.bottom() {
            break;
        }
        render_card(frame, card, toast, &theme);
        y += 4;
    }
}

/// One-line card; messages that wrap past the card width are elided.
fn render_card(frame: &mut Frame, area: Rect, toast: &Toast, theme: &SwitchboardTheme) {
    let (accent, icon) = toast.variant.badge(theme);
    let budget = area.width.saturating_sub(5).max(1) as usize;

    let wrapped = textwrap::wrap(&toast.message, budget);
    let mut text = wrapped.first().map_or_else(String::new, |p| p.to_string());
    if wrapped.len() > 1 {
        text.push('…');
    }

    let line = Line::from(vec![
        Span::styled(format!("{icon} "), Style::default().fg(accent)),
        Span::styled(text, Style::default().fg(theme.text)),
    ]);
    let card = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(theme.bg_panel)),
    );
    frame.render_widget(card, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_toast_is_not_expired() {
        let toast = Toast::new(ToastVariant::Success, "Agents reloaded".to_string());
        assert_eq!(toast.variant, ToastVariant::Success);
        assert!(!toast.expired());
    }

    #[test]
    fn test_manager_keeps_insertion_order() {
        let mut manager = ToastManager::new();
        manager.success("first".to_string());
        manager.error("second".to_string());

        let messages: Vec<&str> = manager
            .toasts()
            .iter()
            .map(|t| t.message.as_str())
            .collect();
        assert_eq!(messages, vec!["first", "second"]);

        manager.clear();
        assert!(manager.toasts().is_empty());
    }

    #[test]
    fn test_manager_drops_oldest_past_cap() {
        let mut manager = ToastManager::new();
        for i in 0..7 {
            manager.info(format!("toast {i}"));
        }
        assert_eq!(manager.toasts().len(), MAX_STACKED);
        assert_eq!(manager.toasts()[0].message, "toast 2");
    }
}
