use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::state::HistoryState;
use crate::common::truncate_with_ellipsis;

pub const SIDEBAR_WIDTH: u16 = 34;

pub fn render_sidebar(history: &HistoryState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " History ",
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let width = block.inner(area).width.saturating_sub(1) as usize;

    let lines: Vec<Line> = if history.labels().is_empty() {
        vec![Line::from(Span::styled(
            " No conversations yet",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        history
            .labels()
            .iter()
            .rev()
            .map(|label| {
                let flat = label.replace('\n', " ");
                Line::from(format!(" {}", truncate_with_ellipsis(&flat, width)))
            })
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
