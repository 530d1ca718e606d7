//! Composer painting.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthChar;

use super::text_buffer::TextBuffer;
use crate::state::TuiState;

const INPUT_HEIGHT_MIN: u16 = 5;
const INPUT_HEIGHT_MAX_PERCENT: f32 = 0.4;

/// Box height for the composer: grows with the text, capped at 40% of
/// the screen.
pub fn calculate_input_height(state: &TuiState, terminal_height: u16) -> u16 {
    let lines = state.input.buffer.lines().len() as u16;
    let max_height = (f32::from(terminal_height) * INPUT_HEIGHT_MAX_PERCENT) as u16;
    (lines + 2).max(INPUT_HEIGHT_MIN).min(max_height.max(INPUT_HEIGHT_MIN))
}

/// Visual rows of `buffer` soft-wrapped at `width`, plus the cursor's
/// `(row, col)` on that grid.
fn layout_rows(buffer: &TextBuffer, width: usize) -> (Vec<String>, (usize, usize)) {
    let width = width.max(1);
    let (cursor_row, cursor_col) = buffer.cursor();
    let mut rows = Vec::new();
    let mut cursor = (0, 0);

    for (line_idx, line) in buffer.lines().iter().enumerate() {
        let mut row = String::new();
        let mut used = 0;
        for (col, ch) in line.chars().enumerate() {
            let w = ch.width().unwrap_or(0);
            if used + w > width {
                rows.push(std::mem::take(&mut row));
                used = 0;
            }
            if line_idx == cursor_row && col == cursor_col {
                cursor = (rows.len(), used);
            }
            row.push(ch);
            used += w;
        }
        if line_idx == cursor_row && cursor_col >= line.chars().count() {
            cursor = if used >= width {
                (rows.len() + 1, 0)
            } else {
                (rows.len(), used)
            };
        }
        rows.push(row);
    }

    (rows, cursor)
}

pub fn render_input(state: &TuiState, frame: &mut Frame, area: Rect, show_cursor: bool) {
    let input = &state.input;
    let border = if input.enabled {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    };
    let hint = if input.enabled {
        " Enter send · Shift+Enter newline "
    } else {
        " waiting for response… "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(format!(" {} ", state.model), border))
        .title_bottom(Line::from(Span::styled(hint, border)).alignment(Alignment::Right));

    let inner = block.inner(area);
    if inner.width == 0 || inner.height == 0 {
        frame.render_widget(block, area);
        return;
    }

    let (rows, (cursor_row, cursor_col)) = layout_rows(&input.buffer, inner.width as usize);
    let height = inner.height as usize;
    let scroll = (cursor_row + 1).saturating_sub(height);

    let text_style = if input.enabled {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let lines: Vec<Line> = rows
        .into_iter()
        .skip(scroll)
        .take(height)
        .map(|row| Line::from(Span::styled(row, text_style)))
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);

    if show_cursor && input.enabled && input.focused {
        let x = inner.x + cursor_col as u16;
        let y = inner.y + (cursor_row - scroll) as u16;
        if x < inner.right() && y < inner.bottom() {
            frame.set_cursor_position((x, y));
        }
    }
}
