use super::text_buffer::TextBuffer;

/// Composer state.
///
/// `enabled` gates editing and submission; it is cleared while a response
/// is in flight. `focused` decides whether the terminal cursor is shown.
#[derive(Debug, Clone)]
pub struct InputState {
    pub buffer: TextBuffer,
    pub enabled: bool,
    pub focused: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            buffer: TextBuffer::default(),
            enabled: true,
            focused: true,
        }
    }
}

impl InputState {
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.focused = false;
    }

    pub fn enable_and_focus(&mut self) {
        self.enabled = true;
        self.focused = true;
    }
}
