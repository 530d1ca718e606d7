//! Transcript painting.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::state::TranscriptState;
use super::style::{Style as TranscriptStyle, StyledLine};
use crate::common::Scrollbar;

/// Blank columns on each side of the transcript.
pub const TRANSCRIPT_MARGIN: u16 = 1;
pub const SCROLLBAR_WIDTH: u16 = 1;

/// Columns available to cell content inside `area_width`.
pub fn content_width(area_width: u16) -> usize {
    area_width.saturating_sub(TRANSCRIPT_MARGIN * 2 + SCROLLBAR_WIDTH) as usize
}

/// All transcript lines at `width`, one blank line after each cell.
pub fn transcript_lines(
    transcript: &TranscriptState,
    width: usize,
    spinner_frame: usize,
) -> Vec<StyledLine> {
    let mut lines = Vec::new();
    for cell in transcript.cells() {
        lines.extend(cell.display_lines(width, spinner_frame));
        lines.push(StyledLine::empty());
    }
    lines
}

pub fn render_transcript(
    frame: &mut Frame,
    area: Rect,
    transcript: &TranscriptState,
    spinner_frame: usize,
) {
    let width = content_width(area.width);
    let height = area.height as usize;
    let lines = transcript_lines(transcript, width, spinner_frame);
    let total = lines.len();

    let offset = match transcript.scroll.mode {
        super::state::ScrollMode::FollowLatest => total.saturating_sub(height),
        super::state::ScrollMode::Anchored { offset } => offset.min(total.saturating_sub(height)),
    };

    let mut visible: Vec<Line<'static>> = lines
        .into_iter()
        .skip(offset)
        .take(height)
        .map(convert_line)
        .collect();

    // Short transcripts sit on top of the input box.
    if visible.len() < height {
        let padding = height - visible.len();
        visible.splice(0..0, std::iter::repeat_n(Line::default(), padding));
    }

    let content_area = Rect {
        x: area.x + TRANSCRIPT_MARGIN,
        width: width as u16,
        ..area
    };
    frame.render_widget(Paragraph::new(visible), content_area);
    frame.render_widget(Scrollbar::new(total, height, offset), area);
}

fn convert_line(line: StyledLine) -> Line<'static> {
    Line::from(
        line.spans
            .into_iter()
            .map(|span| Span::styled(span.text, convert_style(span.style)))
            .collect::<Vec<_>>(),
    )
}

fn convert_style(style: TranscriptStyle) -> Style {
    let base = Style::default();
    match style {
        TranscriptStyle::Plain | TranscriptStyle::Model | TranscriptStyle::Table => base,
        TranscriptStyle::UserPrefix => base.fg(Color::Green).add_modifier(Modifier::BOLD),
        TranscriptStyle::User => base.fg(Color::Green),
        TranscriptStyle::SystemPrefix => base.fg(Color::Magenta).add_modifier(Modifier::BOLD),
        TranscriptStyle::System => base.fg(Color::DarkGray),
        TranscriptStyle::Loading => base.fg(Color::Cyan).add_modifier(Modifier::DIM),
        TranscriptStyle::Error => base.fg(Color::Red),
        TranscriptStyle::CodeInline | TranscriptStyle::CodeBlock => base.fg(Color::Cyan),
        TranscriptStyle::CodeFence | TranscriptStyle::Rule => base.fg(Color::DarkGray),
        TranscriptStyle::Diagram => base.fg(Color::LightBlue),
        TranscriptStyle::Emphasis => base.add_modifier(Modifier::ITALIC),
        TranscriptStyle::Strong => base.add_modifier(Modifier::BOLD),
        TranscriptStyle::Strikethrough => base.add_modifier(Modifier::CROSSED_OUT),
        TranscriptStyle::H1 => base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        TranscriptStyle::H2 => base.add_modifier(Modifier::BOLD),
        TranscriptStyle::H3 => base.add_modifier(Modifier::ITALIC),
        TranscriptStyle::Link => base.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
        TranscriptStyle::BlockQuote => base.fg(Color::Green).add_modifier(Modifier::ITALIC),
        TranscriptStyle::ListBullet | TranscriptStyle::ListNumber => base.fg(Color::Yellow),
    }
}

#[cfg(test)]
mod tests {
    use volt_core::stream::{MessageView, Sender};

    use super::*;
    use crate::transcript::HistoryCell;

    #[test]
    fn test_cells_are_separated_by_blank_lines() {
        let mut transcript = TranscriptState::new();
        transcript.push_cell(HistoryCell::system("ready"));
        transcript.append(Sender::User, "hi", false);

        let lines: Vec<String> = transcript_lines(&transcript, 40, 0)
            .iter()
            .map(StyledLine::text)
            .collect();
        assert_eq!(lines, vec!["ℹ ready", "", "│ hi", ""]);
    }

    #[test]
    fn test_content_width_leaves_room_for_margins() {
        assert_eq!(content_width(80), 77);
        assert_eq!(content_width(2), 0);
    }
}
