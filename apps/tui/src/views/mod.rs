//! TUI view modules

pub mod chat;
pub mod editor;
pub mod header;
pub mod layout;
pub mod listing;

pub use chat::render_chat;
pub use editor::render_editor;
pub use header::render_header;
pub use layout::{render_footer, split_body, split_screen};
pub use listing::render_listing;
