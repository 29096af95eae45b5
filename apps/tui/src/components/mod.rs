//! Reusable TUI components.
//!
//! Overlay widgets shared across views: toasts, confirmation dialogs,
//! and the mention completion popup.

pub mod dialog;
pub mod mention_popup;
pub mod toast;

pub use dialog::{Dialog, DialogChoice, DialogManager, render_dialog};
pub use mention_popup::render_mention_popup;
pub use toast::{Toast, ToastManager, ToastVariant, render_toasts};
