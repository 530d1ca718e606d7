//! Transcript scrollbar with a thumb whose length never changes while
//! scrolling.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

const THUMB: &str = "█";
const TRACK: &str = "│";

#[derive(Debug, Clone, Copy)]
pub struct Scrollbar {
    content_lines: usize,
    viewport_lines: usize,
    offset: usize,
}

impl Scrollbar {
    pub fn new(content_lines: usize, viewport_lines: usize, offset: usize) -> Self {
        Self {
            content_lines,
            viewport_lines,
            offset,
        }
    }

    /// Returns `(start, len)` of the thumb within a track of `track_len`
    /// cells, or `None` when everything fits.
    pub fn thumb(&self, track_len: usize) -> Option<(usize, usize)> {
        let max_offset = self.content_lines.saturating_sub(self.viewport_lines);
        if track_len == 0 || max_offset == 0 {
            return None;
        }

        let visible = self.viewport_lines.min(track_len);
        let denom = (self.content_lines - 1 + visible) as u64;
        let len = ((track_len as u64 * visible as u64 + denom / 2) / denom) as usize;
        let len = len.clamp(1, track_len);

        let room = (track_len - len) as u64;
        let start = (self.offset.min(max_offset) as u64 * room / max_offset as u64) as usize;
        Some((start, len))
    }
}

impl Widget for Scrollbar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some((start, len)) = self.thumb(area.height as usize) else {
            return;
        };

        let x = area.right().saturating_sub(1);
        let style = Style::default().fg(Color::DarkGray);
        for row in 0..area.height as usize {
            let symbol = if (start..start + len).contains(&row) {
                THUMB
            } else {
                TRACK
            };
            buf.set_string(x, area.y + row as u16, symbol, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_when_content_fits() {
        assert_eq!(Scrollbar::new(10, 20, 0).thumb(20), None);
        assert_eq!(Scrollbar::new(20, 20, 0).thumb(20), None);
    }

    #[test]
    fn test_thumb_length_is_stable() {
        let top = Scrollbar::new(100, 20, 0).thumb(20).unwrap();
        let middle = Scrollbar::new(100, 20, 40).thumb(20).unwrap();
        let bottom = Scrollbar::new(100, 20, 80).thumb(20).unwrap();
        assert_eq!(top.1, middle.1);
        assert_eq!(middle.1, bottom.1);
    }

    #[test]
    fn test_thumb_reaches_both_ends() {
        let (start, _) = Scrollbar::new(100, 20, 0).thumb(20).unwrap();
        assert_eq!(start, 0);

        let (start, len) = Scrollbar::new(100, 20, 80).thumb(20).unwrap();
        assert_eq!(start + len, 20);
    }

    #[test]
    fn test_offset_past_end_is_clamped() {
        let (start, len) = Scrollbar::new(100, 20, 500).thumb(20).unwrap();
        assert_eq!(start + len, 20);
    }
}
