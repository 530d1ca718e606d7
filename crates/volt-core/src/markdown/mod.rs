//! Markdown boundary: a pluggable renderer plus one code-block hook.

mod extension;
mod html;

pub use extension::{DIAGRAM_TAG, diagram_block, escape_angle_brackets};
pub use html::{HtmlRenderer, HtmlTranscript};

/// Renders markdown source into some displayable form.
pub trait MarkdownRenderer {
    type Output;

    fn render(&self, source: &str) -> Self::Output;
}

/// Custom renderer for fenced code blocks.
///
/// Receives the block's language tag (first word of the info string, if any)
/// and its raw text. Returning `None` means "use default rendering".
pub type CodeBlockExtension = fn(Option<&str>, &str) -> Option<String>;

/// Extracts the language tag from a fenced code block's info string.
pub fn code_block_lang(info: &str) -> Option<&str> {
    info.split_whitespace().next()
}
