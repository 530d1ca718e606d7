use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::OverlayAction;
use super::render_utils::{calculate_overlay_area, render_overlay_container};

const NOTICE_WIDTH: u16 = 60;
const NOTICE_HEIGHT: u16 = 9;

/// A dismissable message box.
#[derive(Debug, Clone)]
pub struct NoticeState {
    pub title: String,
    pub message: String,
}

impl NoticeState {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayAction {
        if key.kind == KeyEventKind::Release {
            return OverlayAction::Keep;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => OverlayAction::Close,
            _ => OverlayAction::Keep,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, input_y: u16) {
        let popup = calculate_overlay_area(area, input_y, NOTICE_WIDTH, NOTICE_HEIGHT);
        render_overlay_container(frame, popup, &self.title, Color::Yellow);

        let inner = Rect::new(
            popup.x + 2,
            popup.y + 1,
            popup.width.saturating_sub(4),
            popup.height.saturating_sub(2),
        );
        let lines = vec![
            Line::from(self.message.as_str()),
            Line::default(),
            Line::from(Span::styled(
                "Enter or Esc to close",
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Right),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }
}
