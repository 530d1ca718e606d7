//! Transcript cells.

use std::sync::atomic::{AtomicU64, Ordering};

use unicode_width::UnicodeWidthStr;
use volt_core::stream::Sender;

use super::markdown::MarkdownDoc;
use super::style::{Style, StyledLine, StyledSpan};
use super::wrap::{WrapOptions, wrap_styled_spans};

static NEXT_CELL_ID: AtomicU64 = AtomicU64::new(1);

/// Spinner shown in loading placeholders and the status line.
pub const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

const USER_PREFIX: &str = "│ ";
const SYSTEM_PREFIX: &str = "ℹ ";
const ERROR_PREFIX: &str = "⚠ ";

/// Process-unique, monotonically increasing cell identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u64);

impl CellId {
    pub fn new() -> Self {
        CellId(NEXT_CELL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for CellId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    /// Animated placeholder until the first chunk.
    Loading,
    Rendered(MarkdownDoc),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryCell {
    Message {
        id: CellId,
        sender: Sender,
        body: MessageBody,
    },
    /// Local notes such as the model name; never sent to the model.
    System { id: CellId, content: String },
}

impl HistoryCell {
    pub fn message(sender: Sender, body: MessageBody) -> Self {
        HistoryCell::Message {
            id: CellId::new(),
            sender,
            body,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        HistoryCell::System {
            id: CellId::new(),
            content: content.into(),
        }
    }

    pub fn id(&self) -> CellId {
        match self {
            HistoryCell::Message { id, .. } | HistoryCell::System { id, .. } => *id,
        }
    }

    pub fn body(&self) -> Option<&MessageBody> {
        match self {
            HistoryCell::Message { body, .. } => Some(body),
            HistoryCell::System { .. } => None,
        }
    }

    /// Replaces the body of a message cell. No-op for system cells.
    pub fn set_body(&mut self, new_body: MessageBody) {
        if let HistoryCell::Message { body, .. } = self {
            *body = new_body;
        }
    }

    pub fn display_lines(&self, width: usize, spinner_frame: usize) -> Vec<StyledLine> {
        match self {
            HistoryCell::Message {
                sender: Sender::User,
                body,
                ..
            } => {
                let inner = width.saturating_sub(USER_PREFIX.width()).max(1);
                let mut lines: Vec<StyledLine> = body_lines(body, inner, spinner_frame)
                    .into_iter()
                    .map(|mut line| {
                        for span in &mut line.spans {
                            if span.style == Style::Model {
                                span.style = Style::User;
                            }
                        }
                        line.spans
                            .insert(0, StyledSpan::new(USER_PREFIX, Style::UserPrefix));
                        line
                    })
                    .collect();
                if lines.is_empty() {
                    lines.push(StyledLine::plain(USER_PREFIX, Style::UserPrefix));
                }
                lines
            }
            HistoryCell::Message {
                sender: Sender::Model,
                body,
                ..
            } => body_lines(body, width, spinner_frame),
            HistoryCell::System { content, .. } => {
                let opts = WrapOptions {
                    width,
                    first_prefix: vec![StyledSpan::new(SYSTEM_PREFIX, Style::SystemPrefix)],
                    rest_prefix: vec![StyledSpan::new("  ", Style::Plain)],
                };
                wrap_styled_spans(&[StyledSpan::new(content.clone(), Style::System)], &opts)
            }
        }
    }
}

fn body_lines(body: &MessageBody, width: usize, spinner_frame: usize) -> Vec<StyledLine> {
    match body {
        MessageBody::Loading => {
            let frame = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];
            vec![StyledLine::plain(format!("{frame} Thinking…"), Style::Loading)]
        }
        MessageBody::Rendered(doc) => doc.lines(width),
        MessageBody::Error(message) => {
            let opts = WrapOptions {
                width,
                first_prefix: vec![StyledSpan::new(ERROR_PREFIX, Style::Error)],
                rest_prefix: vec![StyledSpan::new("  ", Style::Plain)],
            };
            wrap_styled_spans(&[StyledSpan::new(message.clone(), Style::Error)], &opts)
        }
    }
}
