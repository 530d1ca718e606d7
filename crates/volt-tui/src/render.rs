//! Pure view functions.
//!
//! Everything here takes `&AppState`, draws to a ratatui `Frame`, and never
//! mutates state or returns effects.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use volt_core::stream::StreamPhase;

use crate::history::{self, SIDEBAR_WIDTH};
use crate::input;
use crate::overlays::OverlayExt;
use crate::state::{AppState, TuiState};
use crate::suggestions;
use crate::transcript::{self, SPINNER_FRAMES};

const STATUS_HEIGHT: u16 = 1;

/// The sidebar only appears when the transcript keeps at least this many
/// columns next to it.
const MIN_TRANSCRIPT_WIDTH_WITH_SIDEBAR: u16 = 60;

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub transcript: Rect,
    pub input: Rect,
    pub status: Rect,
    pub sidebar: Option<Rect>,
}

/// Splits `area` into transcript, composer, status line and (optionally)
/// the history sidebar on the left.
pub fn layout(state: &TuiState, area: Rect) -> Areas {
    let show_sidebar = !state.history.labels().is_empty()
        && area.width >= SIDEBAR_WIDTH + MIN_TRANSCRIPT_WIDTH_WITH_SIDEBAR;

    let (sidebar, main) = if show_sidebar {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
            .split(area);
        (Some(columns[0]), columns[1])
    } else {
        (None, area)
    };

    let input_height = input::calculate_input_height(state, main.height);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(input_height),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(main);

    Areas {
        transcript: rows[0],
        input: rows[1],
        status: rows[2],
        sidebar,
    }
}

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let state = &app.tui;
    let areas = layout(state, frame.area());

    // The welcome panel replaces the transcript until the first submission.
    if state.conversation_started {
        transcript::render_transcript(
            frame,
            areas.transcript,
            &state.transcript,
            state.spinner_frame,
        );
    } else {
        suggestions::render_suggestions(&state.suggestions, frame, areas.transcript);
    }

    input::render_input(state, frame, areas.input, app.overlay.is_none());
    render_status_line(state, frame, areas.status);

    if let Some(sidebar) = areas.sidebar {
        history::render_sidebar(&state.history, frame, sidebar);
    }

    // Last, so it sits on top.
    app.overlay.render(frame, frame.area(), areas.input.y);
}

fn render_status_line(state: &TuiState, frame: &mut Frame, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let spinner = SPINNER_FRAMES[state.spinner_frame % SPINNER_FRAMES.len()];
    let mut spans: Vec<Span> = Vec::new();

    match state.response.phase() {
        Some(StreamPhase::Pending) => spans.extend([
            Span::styled(spinner, Style::default().fg(Color::Yellow)),
            Span::raw(" "),
            Span::styled("Waiting...", Style::default().fg(Color::Yellow)),
            Span::raw("  "),
        ]),
        Some(StreamPhase::Streaming) => spans.extend([
            Span::styled(spinner, Style::default().fg(Color::Cyan)),
            Span::raw(" "),
            Span::styled("Streaming...", Style::default().fg(Color::Cyan)),
            Span::raw("  "),
        ]),
        Some(StreamPhase::Settled | StreamPhase::Failed) | None => {}
    }

    if let Some(dictation) = &state.dictation {
        if dictation.is_recording() {
            spans.extend([
                Span::styled(
                    "● REC",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled("Ctrl+R", dim),
                Span::raw(" stop  "),
            ]);
        } else if dictation.control_enabled {
            spans.extend([Span::styled("Ctrl+R", dim), Span::raw(" dictate  ")]);
        }
    }

    spans.extend([Span::styled("Ctrl+C", dim), Span::raw(" quit")]);

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Left),
        area,
    );
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::dictation::DictationPhase;

    fn screen_text(app: &AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..height {
            for x in 0..width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_layout_without_history_has_no_sidebar() {
        let state = TuiState::new("m".to_string(), false);
        let areas = layout(&state, Rect::new(0, 0, 120, 30));
        assert!(areas.sidebar.is_none());
        assert_eq!(areas.transcript.width, 120);
        assert_eq!(areas.status.height, 1);
        assert_eq!(areas.status.bottom(), 30);
        assert_eq!(areas.input.bottom(), areas.status.y);
    }

    #[test]
    fn test_sidebar_needs_history_and_width() {
        let mut state = TuiState::new("m".to_string(), false);
        state.history.record("Need a regulator");

        let wide = layout(&state, Rect::new(0, 0, 120, 30));
        assert_eq!(wide.sidebar.map(|r| r.width), Some(SIDEBAR_WIDTH));
        assert_eq!(wide.transcript.x, SIDEBAR_WIDTH);

        let narrow = layout(&state, Rect::new(0, 0, 70, 30));
        assert!(narrow.sidebar.is_none());
    }

    #[test]
    fn test_welcome_panel_until_first_message() {
        let mut app = AppState::new("gemini-2.5-flash".to_string(), false);
        let text = screen_text(&app, 100, 30);
        assert!(text.contains("What are we building today?"));
        assert!(text.contains("gemini-2.5-flash"));
        assert!(!text.contains("Ctrl+R"));

        app.tui.conversation_started = true;
        let text = screen_text(&app, 100, 30);
        assert!(!text.contains("What are we building today?"));
    }

    #[test]
    fn test_welcome_panel_replaces_transcript() {
        let mut app = AppState::new("m".to_string(), false);
        app.tui
            .transcript
            .push_cell(crate::transcript::HistoryCell::system("Model: gemini-2.5-flash"));

        let text = screen_text(&app, 100, 30);
        assert!(text.contains("What are we building today?"));
        assert!(!text.contains("Model: gemini-2.5-flash"));

        app.tui.conversation_started = true;
        let text = screen_text(&app, 100, 30);
        assert!(text.contains("Model: gemini-2.5-flash"));
    }

    #[test]
    fn test_status_line_shows_recording_badge() {
        let mut app = AppState::new("m".to_string(), true);
        assert!(screen_text(&app, 100, 20).contains("Ctrl+R dictate"));

        if let Some(dictation) = app.tui.dictation.as_mut() {
            dictation.phase = DictationPhase::Recording;
        }
        assert!(screen_text(&app, 100, 20).contains("● REC"));
    }
}
