//! Reducer: `(state, event) -> effects`.
//!
//! Mutates state in place and returns effects for the runtime. Never
//! performs I/O.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::dictation;
use crate::effects::UiEffect;
use crate::events::{ResponseEvent, UiEvent};
use crate::input;
use crate::overlays::{Overlay, OverlayExt};
use crate::render;
use crate::state::{AppState, ResponseState, TuiState};
use crate::transcript::{TerminalMarkdown, content_width, transcript_lines};

/// Lines moved per mouse-wheel notch before acceleration.
const WHEEL_LINES: i32 = 3;

pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Frame { width, height } => {
            handle_frame(&mut app.tui, width, height);
            vec![]
        }
        UiEvent::Terminal(event) => handle_terminal_event(app, event),
        UiEvent::ResponseSpawned { rx } => {
            if let ResponseState::Active { rx: slot, .. } = &mut app.tui.response {
                *slot = Some(rx);
            }
            vec![]
        }
        UiEvent::Response(event) => handle_response_event(&mut app.tui, event),
        UiEvent::Dictation(event) => {
            let (effects, request) = dictation::handle_event(&mut app.tui, event);
            if let Some(request) = request {
                app.overlay = Some(Overlay::open(request));
            }
            effects
        }
    }
}

/// Refreshes layout-dependent scroll state before the batch's other events.
fn handle_frame(tui: &mut TuiState, width: u16, height: u16) {
    let areas = render::layout(tui, Rect::new(0, 0, width, height));
    let lines = transcript_lines(
        &tui.transcript,
        content_width(areas.transcript.width),
        tui.spinner_frame,
    );
    tui.transcript.viewport_height = areas.transcript.height as usize;
    tui.transcript.scroll.line_count = lines.len();
    tui.transcript.apply_scroll_delta();
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Paste(text) if app.overlay.is_none() => {
            input::handle_paste(&mut app.tui.input, &text);
            vec![]
        }
        Event::Mouse(mouse) => {
            handle_mouse(&mut app.tui, mouse);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_mouse(tui: &mut TuiState, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => tui.transcript.scroll_accumulator.accumulate(-WHEEL_LINES),
        MouseEventKind::ScrollDown => tui.transcript.scroll_accumulator.accumulate(WHEEL_LINES),
        _ => {}
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if app.overlay.handle_key(key) {
        return vec![];
    }

    let tui = &mut app.tui;
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let newline_mod = key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('c') if ctrl => vec![UiEffect::Quit],
        KeyCode::Char('r') if ctrl => dictation::toggle(tui),
        KeyCode::Esc => {
            if !tui.response.is_active() && tui.input.is_empty() {
                vec![UiEffect::Quit]
            } else {
                if tui.input.enabled {
                    tui.input.clear();
                }
                vec![]
            }
        }
        KeyCode::Enter if newline_mod => {
            if tui.input.enabled {
                tui.input.buffer.insert_newline();
            }
            vec![]
        }
        KeyCode::Char('j') if ctrl => {
            if tui.input.enabled {
                tui.input.buffer.insert_newline();
            }
            vec![]
        }
        KeyCode::Enter => {
            let text = tui.input.text();
            input::submit(tui, &text)
        }
        KeyCode::Tab => {
            if !tui.conversation_started {
                tui.suggestions.fill(&mut tui.input);
            }
            vec![]
        }
        KeyCode::PageUp => {
            tui.transcript.page_up();
            vec![]
        }
        KeyCode::PageDown => {
            tui.transcript.page_down();
            vec![]
        }
        KeyCode::End if tui.input.is_empty() => {
            tui.transcript.scroll.scroll_to_bottom();
            vec![]
        }
        KeyCode::Up if !tui.input.enabled => {
            tui.transcript.scroll_up(1);
            vec![]
        }
        KeyCode::Down if !tui.input.enabled => {
            tui.transcript.scroll_down(1);
            vec![]
        }
        _ => {
            if tui.input.enabled {
                tui.input.buffer.input(key);
            }
            vec![]
        }
    }
}

fn handle_response_event(tui: &mut TuiState, event: ResponseEvent) -> Vec<UiEffect> {
    let ResponseState::Active { renderer, .. } = &mut tui.response else {
        tracing::debug!(?event, "response event without an active response");
        return vec![];
    };

    match event {
        ResponseEvent::Chunk(text) => {
            renderer.apply_chunk(&mut tui.transcript, &TerminalMarkdown, &text);
            vec![]
        }
        ResponseEvent::Completed => {
            renderer.settle(&mut tui.transcript, &TerminalMarkdown);
            let reply = renderer.text().to_string();
            tui.finish_response();
            vec![UiEffect::CompleteTurn { reply: Some(reply) }]
        }
        ResponseEvent::Failed(message) => {
            tracing::warn!(error = %message, "response failed");
            renderer.fail(&mut tui.transcript);
            tui.finish_response();
            vec![UiEffect::CompleteTurn { reply: None }]
        }
    }
}

#[cfg(test)]
mod tests {
    use volt_core::stream::STREAM_ERROR_MESSAGE;

    use super::*;
    use crate::dictation::{DictationErrorKind, DictationEvent};
    use crate::transcript::{HistoryCell, MessageBody};

    fn app() -> AppState {
        AppState::new("gemini-2.5-flash".to_string(), true)
    }

    fn key(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn key_with(code: KeyCode, modifiers: KeyModifiers) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, modifiers)))
    }

    fn type_text(app: &mut AppState, text: &str) {
        for ch in text.chars() {
            update(app, key(KeyCode::Char(ch)));
        }
    }

    fn reply_body(app: &AppState) -> Option<MessageBody> {
        app.tui
            .transcript
            .cells()
            .last()
            .and_then(HistoryCell::body)
            .cloned()
    }

    #[test]
    fn test_typing_and_enter_submits() {
        let mut app = app();
        type_text(&mut app, "hi");
        let effects = update(&mut app, key(KeyCode::Enter));
        assert_eq!(
            effects,
            vec![UiEffect::StartResponse {
                prompt: "hi".to_string()
            }]
        );
        assert!(!app.tui.input.enabled);
    }

    #[test]
    fn test_enter_on_empty_input_is_noop() {
        let mut app = app();
        assert!(update(&mut app, key(KeyCode::Enter)).is_empty());
        assert!(app.tui.transcript.cells().is_empty());
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        let mut app = app();
        type_text(&mut app, "a");
        update(&mut app, key_with(KeyCode::Enter, KeyModifiers::SHIFT));
        type_text(&mut app, "b");
        assert_eq!(app.tui.input.text(), "a\nb");
    }

    #[test]
    fn test_composer_disabled_until_settled() {
        let mut app = app();
        type_text(&mut app, "12V to 5V?");
        update(&mut app, key(KeyCode::Enter));

        type_text(&mut app, "ignored");
        assert!(app.tui.input.is_empty());

        update(&mut app, UiEvent::Response(ResponseEvent::Chunk("Use an ".to_string())));
        assert!(!app.tui.input.enabled);
        update(&mut app, UiEvent::Response(ResponseEvent::Chunk("LM7805.".to_string())));

        let effects = update(&mut app, UiEvent::Response(ResponseEvent::Completed));
        assert_eq!(
            effects,
            vec![UiEffect::CompleteTurn {
                reply: Some("Use an LM7805.".to_string())
            }]
        );
        assert!(app.tui.input.enabled);
        assert!(app.tui.input.focused);
        assert!(!app.tui.response.is_active());
        assert!(app.tui.dictation.as_ref().is_some_and(|d| d.control_enabled));
        assert!(matches!(reply_body(&app), Some(MessageBody::Rendered(_))));
    }

    #[test]
    fn test_composer_reenabled_after_failure() {
        let mut app = app();
        type_text(&mut app, "hi");
        update(&mut app, key(KeyCode::Enter));
        update(&mut app, UiEvent::Response(ResponseEvent::Chunk("partial".to_string())));

        let effects = update(
            &mut app,
            UiEvent::Response(ResponseEvent::Failed("HTTP 500".to_string())),
        );
        assert_eq!(effects, vec![UiEffect::CompleteTurn { reply: None }]);
        assert!(app.tui.input.enabled);
        assert_eq!(
            reply_body(&app),
            Some(MessageBody::Error(STREAM_ERROR_MESSAGE.to_string()))
        );
    }

    #[test]
    fn test_completion_without_chunks_clears_placeholder() {
        let mut app = app();
        type_text(&mut app, "hi");
        update(&mut app, key(KeyCode::Enter));
        update(&mut app, UiEvent::Response(ResponseEvent::Completed));
        assert!(matches!(reply_body(&app), Some(MessageBody::Rendered(doc)) if doc.is_empty()));
    }

    #[test]
    fn test_stray_response_events_are_ignored() {
        let mut app = app();
        let effects = update(&mut app, UiEvent::Response(ResponseEvent::Completed));
        assert!(effects.is_empty());
        assert!(app.tui.transcript.cells().is_empty());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert_eq!(
            update(&mut app, key_with(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            vec![UiEffect::Quit]
        );

        assert_eq!(update(&mut app, key(KeyCode::Esc)), vec![UiEffect::Quit]);

        type_text(&mut app, "draft");
        assert!(update(&mut app, key(KeyCode::Esc)).is_empty());
        assert!(app.tui.input.is_empty());
    }

    #[test]
    fn test_esc_does_not_quit_mid_response() {
        let mut app = app();
        type_text(&mut app, "hi");
        update(&mut app, key(KeyCode::Enter));
        assert!(update(&mut app, key(KeyCode::Esc)).is_empty());
    }

    #[test]
    fn test_tab_fills_suggestion_before_first_message() {
        let mut app = app();
        update(&mut app, key(KeyCode::Tab));
        assert_eq!(
            app.tui.input.text(),
            volt_core::prompts::SUGGESTED_PROMPTS[0]
        );
    }

    #[test]
    fn test_not_allowed_opens_notice_that_swallows_keys() {
        let mut app = app();
        update(
            &mut app,
            UiEvent::Dictation(DictationEvent::Error(DictationErrorKind::NotAllowed)),
        );
        assert!(matches!(app.overlay, Some(Overlay::Notice(_))));

        type_text(&mut app, "x");
        assert!(app.tui.input.is_empty());

        update(&mut app, key(KeyCode::Enter));
        assert!(app.overlay.is_none());
    }

    #[test]
    fn test_ctrl_r_toggles_dictation() {
        let mut app = app();
        let ctrl_r = || key_with(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(update(&mut app, ctrl_r()), vec![UiEffect::StartDictation]);
        assert_eq!(update(&mut app, ctrl_r()), vec![UiEffect::StopDictation]);
    }

    #[test]
    fn test_frame_tracks_viewport_and_lines() {
        let mut app = app();
        app.tui.transcript.push_cell(HistoryCell::system("ready"));
        update(&mut app, UiEvent::Frame { width: 80, height: 24 });
        assert!(app.tui.transcript.viewport_height > 0);
        assert_eq!(app.tui.transcript.scroll.line_count, 2);
    }

    #[test]
    fn test_tick_advances_spinner() {
        let mut app = app();
        update(&mut app, UiEvent::Tick);
        update(&mut app, UiEvent::Tick);
        assert_eq!(app.tui.spinner_frame, 2);
    }
}
