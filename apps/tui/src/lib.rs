//! Switchboard TUI library.
//!
//! Terminal console for the Multi MCP Agent Platform: a grouped agent
//! listing, a batch form editor, and a mention-driven chat pane.

pub mod app;
pub mod components;
pub mod config;
pub mod theme;
pub mod views;
