//! Multi-line edit buffer for the composer.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Up,
    Down,
    Forward,
    Back,
    Head,
    End,
}

/// Lines plus a `(row, col)` cursor counted in chars.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
        }
    }
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

/// Byte offset of the `col`-th char, clamped to the end of `line`.
pub fn char_to_byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map_or(line.len(), |(idx, _)| idx)
}

impl TextBuffer {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(String::is_empty)
    }

    /// Replaces the contents and puts the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.row = self.lines.len() - 1;
        self.col = char_len(&self.lines[self.row]);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn insert_str(&mut self, text: &str) {
        let mut parts = text.split('\n');
        let Some(first) = parts.next() else {
            return;
        };

        let line = &mut self.lines[self.row];
        let at = char_to_byte_index(line, self.col);
        let tail = line.split_off(at);
        line.push_str(first);
        self.col += char_len(first);

        for part in parts {
            self.row += 1;
            self.lines.insert(self.row, part.to_string());
            self.col = char_len(part);
        }
        self.lines[self.row].push_str(&tail);
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut buf));
    }

    pub fn insert_newline(&mut self) {
        self.insert_str("\n");
    }

    /// Backspace.
    pub fn delete_prev_char(&mut self) {
        if self.col > 0 {
            let line = &mut self.lines[self.row];
            let start = char_to_byte_index(line, self.col - 1);
            let end = char_to_byte_index(line, self.col);
            line.replace_range(start..end, "");
            self.col -= 1;
        } else if self.row > 0 {
            let current = self.lines.remove(self.row);
            self.row -= 1;
            self.col = char_len(&self.lines[self.row]);
            self.lines[self.row].push_str(&current);
        }
    }

    /// Delete.
    pub fn delete_next_char(&mut self) {
        let line_len = char_len(&self.lines[self.row]);
        if self.col < line_len {
            let line = &mut self.lines[self.row];
            let start = char_to_byte_index(line, self.col);
            let end = char_to_byte_index(line, self.col + 1);
            line.replace_range(start..end, "");
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    /// Ctrl+K: drop everything right of the cursor on this line.
    pub fn delete_to_line_end(&mut self) {
        let line = &mut self.lines[self.row];
        let at = char_to_byte_index(line, self.col);
        line.truncate(at);
    }

    /// Ctrl+U: drop everything left of the cursor on this line.
    pub fn delete_to_line_start(&mut self) {
        let line = &mut self.lines[self.row];
        let at = char_to_byte_index(line, self.col);
        line.replace_range(..at, "");
        self.col = 0;
    }

    pub fn move_cursor(&mut self, movement: CursorMove) {
        match movement {
            CursorMove::Up if self.row > 0 => {
                self.row -= 1;
                self.col = self.col.min(char_len(&self.lines[self.row]));
            }
            CursorMove::Down if self.row + 1 < self.lines.len() => {
                self.row += 1;
                self.col = self.col.min(char_len(&self.lines[self.row]));
            }
            CursorMove::Forward => {
                if self.col < char_len(&self.lines[self.row]) {
                    self.col += 1;
                } else if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = 0;
                }
            }
            CursorMove::Back => {
                if self.col > 0 {
                    self.col -= 1;
                } else if self.row > 0 {
                    self.row -= 1;
                    self.col = char_len(&self.lines[self.row]);
                }
            }
            CursorMove::Head => self.col = 0,
            CursorMove::End => self.col = char_len(&self.lines[self.row]),
            CursorMove::Up | CursorMove::Down => {}
        }
    }

    /// Applies a plain editing key. Keys with meaning elsewhere (Enter,
    /// Tab, Esc) are left to the caller.
    pub fn input(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('a') if ctrl => self.move_cursor(CursorMove::Head),
            KeyCode::Char('e') if ctrl => self.move_cursor(CursorMove::End),
            KeyCode::Char('k') if ctrl => self.delete_to_line_end(),
            KeyCode::Char('u') if ctrl => self.delete_to_line_start(),
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert_char(ch);
            }
            KeyCode::Backspace => self.delete_prev_char(),
            KeyCode::Delete => self.delete_next_char(),
            KeyCode::Left => self.move_cursor(CursorMove::Back),
            KeyCode::Right => self.move_cursor(CursorMove::Forward),
            KeyCode::Up => self.move_cursor(CursorMove::Up),
            KeyCode::Down => self.move_cursor(CursorMove::Down),
            KeyCode::Home => self.move_cursor(CursorMove::Head),
            KeyCode::End => self.move_cursor(CursorMove::End),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_multiline_keeps_tail() {
        let mut buf = TextBuffer::default();
        buf.insert_str("ab");
        buf.move_cursor(CursorMove::Back);
        buf.insert_str("1\n2\n3");
        assert_eq!(buf.lines(), &["a1", "2", "3b"]);
        assert_eq!(buf.cursor(), (2, 1));
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut buf = TextBuffer::default();
        buf.set_text("ab\ncd");
        buf.move_cursor(CursorMove::Head);
        buf.delete_prev_char();
        assert_eq!(buf.text(), "abcd");
        assert_eq!(buf.cursor(), (0, 2));
    }

    #[test]
    fn test_delete_joins_next_line() {
        let mut buf = TextBuffer::default();
        buf.set_text("ab\ncd");
        buf.move_cursor(CursorMove::Up);
        buf.move_cursor(CursorMove::End);
        buf.delete_next_char();
        assert_eq!(buf.text(), "abcd");
    }

    #[test]
    fn test_multibyte_chars() {
        let mut buf = TextBuffer::default();
        buf.insert_str("Ω→");
        buf.delete_prev_char();
        buf.insert_char('Ω');
        assert_eq!(buf.text(), "ΩΩ");
        assert_eq!(char_to_byte_index("Ω→x", 2), 5);
    }

    #[test]
    fn test_set_text_and_empty() {
        let mut buf = TextBuffer::default();
        assert!(buf.is_empty());
        buf.set_text("line one\nline two");
        assert_eq!(buf.cursor(), (1, 8));
        assert!(!buf.is_empty());
        buf.clear();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_ctrl_shortcuts() {
        let mut buf = TextBuffer::default();
        buf.set_text("hello world");
        buf.input(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert_eq!(buf.cursor(), (0, 0));
        buf.input(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        buf.input(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL));
        assert_eq!(buf.text(), "h");
    }
}
