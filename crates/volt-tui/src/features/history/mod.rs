//! Conversation history sidebar.

mod render;
mod state;

pub use render::{SIDEBAR_WIDTH, render_sidebar};
pub use state::{HISTORY_LABEL_MAX_CHARS, HistoryState, history_label};
