//! Terminal-agnostic styled text.
//!
//! Transcript content is built from semantic [`Style`] tags; `render.rs`
//! maps them to concrete colors.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub style: Style,
}

impl StyledSpan {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>, style: Style) -> Self {
        Self {
            spans: vec![StyledSpan::new(text, style)],
        }
    }

    /// Concatenated text of all spans.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    /// Gutter marker in front of user messages.
    UserPrefix,
    User,
    Model,
    SystemPrefix,
    System,
    /// Placeholder shown until the first chunk arrives.
    Loading,
    Error,

    CodeInline,
    CodeBlock,
    CodeFence,
    /// Source of a diagram block.
    Diagram,
    Emphasis,
    Strong,
    Strikethrough,
    H1,
    H2,
    H3,
    Link,
    BlockQuote,
    ListBullet,
    ListNumber,
    Rule,
    Table,
}

impl Style {
    /// Code styles keep their whitespace and break anywhere when wrapped.
    pub fn is_code(self) -> bool {
        matches!(self, Style::CodeInline | Style::CodeBlock | Style::Diagram)
    }
}
