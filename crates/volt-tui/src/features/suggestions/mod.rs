//! Starter prompts shown before the first message.

mod render;
mod state;

pub use render::render_suggestions;
pub use state::SuggestionsState;
