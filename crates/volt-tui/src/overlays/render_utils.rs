use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear};

/// Centers a `width` x `height` box within `area`, above `available_height`
/// (the top of the input box).
pub fn calculate_overlay_area(area: Rect, available_height: u16, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(available_height.saturating_sub(2));
    Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + available_height.saturating_sub(height) / 2,
        width,
        height,
    )
}

/// Clears the box and draws its border and bold title.
pub fn render_overlay_container(frame: &mut Frame, area: Rect, title: &str, color: Color) {
    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(format!(" {title} "))
            .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_area_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(calculate_overlay_area(area, 30, 60, 10), Rect::new(20, 10, 60, 10));
        assert_eq!(calculate_overlay_area(area, 8, 200, 20), Rect::new(2, 1, 96, 6));
    }
}
