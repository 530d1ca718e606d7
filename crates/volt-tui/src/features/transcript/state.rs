//! Transcript state: cells plus scroll position.

use volt_core::markdown::MarkdownRenderer;
use volt_core::stream::{MessageView, Sender};

use super::cell::{CellId, HistoryCell, MessageBody};
use super::markdown::{MarkdownDoc, TerminalMarkdown};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    /// Stick to the newest line.
    FollowLatest,
    /// Line index of the top of the viewport.
    Anchored { offset: usize },
}

#[derive(Debug, Clone)]
pub struct ScrollState {
    pub mode: ScrollMode,
    /// Total transcript lines at the last frame's width.
    pub line_count: usize,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            mode: ScrollMode::FollowLatest,
            line_count: 0,
        }
    }
}

impl ScrollState {
    pub fn is_following(&self) -> bool {
        self.mode == ScrollMode::FollowLatest
    }

    fn max_offset(&self, viewport_height: usize) -> usize {
        self.line_count.saturating_sub(viewport_height)
    }

    pub fn offset(&self, viewport_height: usize) -> usize {
        match self.mode {
            ScrollMode::FollowLatest => self.max_offset(viewport_height),
            ScrollMode::Anchored { offset } => offset.min(self.max_offset(viewport_height)),
        }
    }

    pub fn scroll_up(&mut self, lines: usize, viewport_height: usize) {
        let offset = self.offset(viewport_height).saturating_sub(lines);
        self.mode = ScrollMode::Anchored { offset };
    }

    /// Returns to follow mode once the bottom is reached.
    pub fn scroll_down(&mut self, lines: usize, viewport_height: usize) {
        if self.is_following() {
            return;
        }
        let max = self.max_offset(viewport_height);
        let offset = (self.offset(viewport_height) + lines).min(max);
        self.mode = if offset >= max {
            ScrollMode::FollowLatest
        } else {
            ScrollMode::Anchored { offset }
        };
    }

    pub fn scroll_to_bottom(&mut self) {
        self.mode = ScrollMode::FollowLatest;
    }
}

/// Collects mouse-wheel notches between frames.
///
/// Consecutive frames scrolling the same way speed up, one extra line per
/// two frames, up to `MAX_STEP` lines per notch.
#[derive(Debug, Clone, Default)]
pub struct ScrollAccumulator {
    pending: i32,
    streak: u8,
    direction: i32,
}

impl ScrollAccumulator {
    const MAX_STEP: i32 = 5;

    /// Positive scrolls down, negative up.
    pub fn accumulate(&mut self, notches: i32) {
        self.pending += notches;
    }

    /// Lines to move this frame (signed).
    pub fn take_delta(&mut self) -> i32 {
        let notches = std::mem::take(&mut self.pending);
        if notches == 0 {
            self.streak = 0;
            self.direction = 0;
            return 0;
        }

        let direction = notches.signum();
        if direction == self.direction {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.direction = direction;
            self.streak = 0;
        }

        let step = (1 + i32::from(self.streak) / 2).min(Self::MAX_STEP);
        notches * step
    }
}

#[derive(Debug, Default)]
pub struct TranscriptState {
    cells: Vec<HistoryCell>,
    pub scroll: ScrollState,
    pub scroll_accumulator: ScrollAccumulator,
    /// Rows available to the transcript at the last frame.
    pub viewport_height: usize,
}

impl TranscriptState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[HistoryCell] {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> Option<&HistoryCell> {
        self.cells.iter().find(|c| c.id() == id)
    }

    pub fn push_cell(&mut self, cell: HistoryCell) -> CellId {
        let id = cell.id();
        self.cells.push(cell);
        id
    }

    fn set_body(&mut self, id: CellId, body: MessageBody) {
        // Streaming always targets the newest cells.
        match self.cells.iter_mut().rev().find(|c| c.id() == id) {
            Some(cell) => cell.set_body(body),
            None => tracing::warn!(cell = id.0, "update for unknown transcript cell"),
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll.scroll_up(lines, self.viewport_height);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll.scroll_down(lines, self.viewport_height);
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.viewport_height.max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.viewport_height.max(1));
    }

    /// Applies wheel input collected since the last frame.
    pub fn apply_scroll_delta(&mut self) {
        let delta = self.scroll_accumulator.take_delta();
        if delta < 0 {
            self.scroll_up(delta.unsigned_abs() as usize);
        } else if delta > 0 {
            self.scroll_down(delta as usize);
        }
    }
}

impl MessageView for TranscriptState {
    type Handle = CellId;
    type Rendered = MarkdownDoc;

    fn append(&mut self, sender: Sender, content: &str, loading: bool) -> CellId {
        let body = if loading {
            MessageBody::Loading
        } else {
            MessageBody::Rendered(TerminalMarkdown.render(content))
        };
        let id = self.push_cell(HistoryCell::message(sender, body));
        self.scroll.scroll_to_bottom();
        id
    }

    fn clear(&mut self, handle: CellId) {
        self.set_body(handle, MessageBody::Rendered(MarkdownDoc::default()));
    }

    fn set_rendered(&mut self, handle: CellId, rendered: MarkdownDoc) {
        self.set_body(handle, MessageBody::Rendered(rendered));
    }

    fn set_error(&mut self, handle: CellId, message: &str) {
        self.set_body(handle, MessageBody::Error(message.to_string()));
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll.scroll_to_bottom();
    }
}

#[cfg(test)]
mod tests {
    use volt_core::stream::{STREAM_ERROR_MESSAGE, StreamingRenderer};

    use super::*;

    #[test]
    fn test_scroll_up_anchors_and_down_returns_to_follow() {
        let mut scroll = ScrollState {
            line_count: 100,
            ..ScrollState::default()
        };
        assert_eq!(scroll.offset(20), 80);

        scroll.scroll_up(10, 20);
        assert_eq!(scroll.mode, ScrollMode::Anchored { offset: 70 });

        scroll.scroll_down(5, 20);
        assert_eq!(scroll.offset(20), 75);

        scroll.scroll_down(50, 20);
        assert!(scroll.is_following());
    }

    #[test]
    fn test_anchored_offset_is_clamped() {
        let scroll = ScrollState {
            mode: ScrollMode::Anchored { offset: 500 },
            line_count: 30,
        };
        assert_eq!(scroll.offset(20), 10);
    }

    #[test]
    fn test_accumulator_accelerates_in_one_direction() {
        let mut acc = ScrollAccumulator::default();
        acc.accumulate(1);
        assert_eq!(acc.take_delta(), 1);
        acc.accumulate(1);
        assert_eq!(acc.take_delta(), 1);
        acc.accumulate(1);
        assert_eq!(acc.take_delta(), 2);

        acc.accumulate(-1);
        assert_eq!(acc.take_delta(), -1);
        assert_eq!(acc.take_delta(), 0);
    }

    #[test]
    fn test_message_view_lifecycle() {
        let mut transcript = TranscriptState::new();
        transcript.scroll.mode = ScrollMode::Anchored { offset: 0 };

        let user = transcript.append(Sender::User, "12V to 5V?", false);
        let reply = transcript.append(Sender::Model, "", true);
        assert!(transcript.scroll.is_following());
        assert_eq!(transcript.cell(reply).and_then(HistoryCell::body), Some(&MessageBody::Loading));

        transcript.clear(reply);
        assert_eq!(
            transcript.cell(reply).and_then(HistoryCell::body),
            Some(&MessageBody::Rendered(MarkdownDoc::default()))
        );

        transcript.set_error(reply, "failed");
        assert_eq!(
            transcript.cell(reply).and_then(HistoryCell::body),
            Some(&MessageBody::Error("failed".to_string()))
        );
        assert!(matches!(
            transcript.cell(user).and_then(HistoryCell::body),
            Some(MessageBody::Rendered(doc)) if !doc.is_empty()
        ));
    }

    #[test]
    fn test_streaming_into_transcript() {
        let mut transcript = TranscriptState::new();
        let handle = transcript.append(Sender::Model, "", true);
        let mut renderer = StreamingRenderer::new(handle);

        renderer.apply_chunk(&mut transcript, &TerminalMarkdown, "Use an ");
        renderer.apply_chunk(&mut transcript, &TerminalMarkdown, "**LM7805**.");
        renderer.settle(&mut transcript, &TerminalMarkdown);

        let expected = TerminalMarkdown.render("Use an **LM7805**.");
        assert_eq!(
            transcript.cell(handle).and_then(HistoryCell::body),
            Some(&MessageBody::Rendered(expected))
        );
    }

    #[test]
    fn test_failed_stream_shows_only_error() {
        let mut transcript = TranscriptState::new();
        let handle = transcript.append(Sender::Model, "", true);
        let mut renderer = StreamingRenderer::new(handle);

        renderer.apply_chunk(&mut transcript, &TerminalMarkdown, "partial");
        renderer.fail(&mut transcript);

        assert_eq!(
            transcript.cell(handle).and_then(HistoryCell::body),
            Some(&MessageBody::Error(STREAM_ERROR_MESSAGE.to_string()))
        );
    }
}
