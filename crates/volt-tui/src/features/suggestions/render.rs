use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::state::SuggestionsState;

/// Welcome panel listing the starter prompts, bottom-aligned in `area`.
pub fn render_suggestions(suggestions: &SuggestionsState, frame: &mut Frame, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(Span::styled(
            "What are we building today?",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];

    let next = suggestions.next_index();
    for (idx, prompt) in suggestions.prompts().iter().enumerate() {
        let marker = if idx == next { "› " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Yellow)),
            Span::raw(*prompt),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Tab inserts a suggestion", dim)));

    let height = (lines.len() as u16).min(area.height);
    let panel = Rect {
        x: area.x + 1,
        y: area.bottom().saturating_sub(height),
        width: area.width.saturating_sub(2),
        height,
    };
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), panel);
}
