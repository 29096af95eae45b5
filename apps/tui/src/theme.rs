//! Color scheme for the Switchboard console.
//!
//! One dark scheme, fetched through `get_theme`. The values follow the
//! indigo-on-slate palette of the platform's web console.

use ratatui::style::Color;
use std::sync::OnceLock;

/// Colors used across the console views.
#[derive(Debug, Clone)]
pub struct SwitchboardTheme {
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_muted: Color,
    pub text_dim: Color,
    pub bg_primary: Color,
    pub bg_panel: Color,
    pub border: Color,
    pub border_active: Color,
}

impl Default for SwitchboardTheme {
    fn default() -> Self {
        Self::midnight()
    }
}

impl SwitchboardTheme {
    /// The indigo-on-slate scheme.
    pub fn midnight() -> Self {
        Self {
            primary: Color::Rgb(99, 102, 241), // indigo #6366F1
            secondary: Color::Rgb(34, 211, 238),
            success: Color::Rgb(34, 197, 94),
            warning: Color::Rgb(234, 179, 8),
            error: Color::Rgb(239, 68, 68),
            info: Color::Rgb(96, 165, 250),
            text: Color::Rgb(229, 231, 235),
            text_muted: Color::Rgb(156, 163, 175),
            text_dim: Color::Rgb(107, 114, 128),
            bg_primary: Color::Rgb(17, 24, 39), // slate #111827
            bg_panel: Color::Rgb(31, 41, 55),
            border: Color::Rgb(55, 65, 81),
            border_active: Color::Rgb(129, 140, 248),
        }
    }
}

static THEME: OnceLock<SwitchboardTheme> = OnceLock::new();

/// The process-wide theme.
pub fn get_theme() -> SwitchboardTheme {
    THEME.get_or_init(SwitchboardTheme::midnight).clone()
}
