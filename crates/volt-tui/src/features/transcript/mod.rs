//! Transcript feature: message cells, markdown layout, scrolling.

mod cell;
mod markdown;
mod render;
mod state;
mod style;
mod wrap;

pub use cell::{CellId, HistoryCell, MessageBody, SPINNER_FRAMES};
pub use markdown::{Block, MarkdownDoc, TerminalMarkdown};
pub use render::{content_width, render_transcript, transcript_lines};
pub use state::{ScrollAccumulator, ScrollMode, ScrollState, TranscriptState};
pub use style::{Style, StyledLine, StyledSpan};
pub use wrap::{WrapOptions, wrap_styled_spans};
