//! Modal overlays.
//!
//! While an overlay is open it receives every key press.

mod notice;
pub mod render_utils;

use crossterm::event::KeyEvent;
pub use notice::NoticeState;
use ratatui::Frame;
use ratatui::layout::Rect;

/// Requests from feature reducers to open an overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayRequest {
    Notice { title: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayAction {
    Keep,
    Close,
}

#[derive(Debug, Clone)]
pub enum Overlay {
    Notice(NoticeState),
}

impl Overlay {
    pub fn open(request: OverlayRequest) -> Self {
        match request {
            OverlayRequest::Notice { title, message } => {
                Overlay::Notice(NoticeState::new(title, message))
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayAction {
        match self {
            Overlay::Notice(state) => state.handle_key(key),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, input_y: u16) {
        match self {
            Overlay::Notice(state) => state.render(frame, area, input_y),
        }
    }
}

/// Convenience methods on the optional active overlay.
pub trait OverlayExt {
    /// Routes a key to the overlay. Returns `false` when none is open.
    fn handle_key(&mut self, key: KeyEvent) -> bool;

    fn render(&self, frame: &mut Frame, area: Rect, input_y: u16);
}

impl OverlayExt for Option<Overlay> {
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Some(overlay) = self.as_mut() else {
            return false;
        };
        if overlay.handle_key(key) == OverlayAction::Close {
            *self = None;
        }
        true
    }

    fn render(&self, frame: &mut Frame, area: Rect, input_y: u16) {
        if let Some(overlay) = self {
            overlay.render(frame, area, input_y);
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    fn notice() -> Option<Overlay> {
        Some(Overlay::open(OverlayRequest::Notice {
            title: "Microphone blocked".to_string(),
            message: "Allow access".to_string(),
        }))
    }

    #[test]
    fn test_no_overlay_does_not_consume_keys() {
        let mut overlay: Option<Overlay> = None;
        assert!(!overlay.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    }

    #[test]
    fn test_notice_swallows_keys_until_dismissed() {
        let mut overlay = notice();
        assert!(overlay.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)));
        assert!(overlay.is_some());

        assert!(overlay.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(overlay.is_none());

        let mut overlay = notice();
        overlay.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(overlay.is_none());
    }
}
