//! Composer reducer: paste handling and prompt submission.

use volt_core::stream::{MessageView, Sender, StreamingRenderer};

use super::state::InputState;
use crate::common::sanitize_for_display;
use crate::effects::UiEffect;
use crate::state::{ResponseState, TuiState};

pub fn handle_paste(input: &mut InputState, text: &str) {
    if !input.enabled {
        return;
    }
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    input.buffer.insert_str(&sanitize_for_display(&text));
}

/// Sends `raw` as the next prompt.
///
/// Whitespace-only text, a disabled composer, or a response already in
/// flight make this a no-op. Otherwise the first submission of the session
/// starts the conversation and records a sidebar label, the composer and
/// dictation control are disabled, and the user message plus a loading
/// placeholder are appended to the transcript.
pub fn submit(tui: &mut TuiState, raw: &str) -> Vec<UiEffect> {
    let prompt = raw.trim();
    if prompt.is_empty() || !tui.input.enabled || tui.response.is_active() {
        return vec![];
    }
    let prompt = prompt.to_string();

    if !tui.conversation_started {
        tui.conversation_started = true;
        tui.history.record(&prompt);
    }

    tui.input.clear();
    tui.input.disable();
    let mut effects = Vec::new();
    if let Some(dictation) = tui.dictation.as_mut() {
        dictation.control_enabled = false;
        if dictation.is_recording() {
            effects.push(UiEffect::StopDictation);
        }
    }

    tui.transcript.append(Sender::User, &prompt, false);
    let handle = tui.transcript.append(Sender::Model, "", true);
    tui.response = ResponseState::Active {
        rx: None,
        renderer: StreamingRenderer::new(handle),
    };

    tracing::debug!(chars = prompt.len(), "prompt submitted");
    effects.push(UiEffect::StartResponse { prompt });
    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::MessageBody;

    fn state() -> TuiState {
        TuiState::new("gemini-2.5-flash".to_string(), true)
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut tui = state();
        assert!(submit(&mut tui, "   \n\t ").is_empty());
        assert!(tui.transcript.cells().is_empty());
        assert!(!tui.conversation_started);
        assert!(tui.input.enabled);
        assert!(tui.history.labels().is_empty());
    }

    #[test]
    fn test_submit_starts_conversation() {
        let mut tui = state();
        tui.input.set_text("  Need a 12V to 5V regulator  ");
        let text = tui.input.text();

        let effects = submit(&mut tui, &text);

        assert_eq!(
            effects,
            vec![UiEffect::StartResponse {
                prompt: "Need a 12V to 5V regulator".to_string()
            }]
        );
        assert!(tui.conversation_started);
        assert_eq!(tui.history.labels(), &["Need a 12V to 5V regulator"]);
        assert!(tui.input.is_empty());
        assert!(!tui.input.enabled);
        assert!(!tui.dictation.as_ref().is_some_and(|d| d.control_enabled));

        let cells = tui.transcript.cells();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].body(), Some(&MessageBody::Loading));
        assert!(tui.response.is_active());
    }

    #[test]
    fn test_submit_while_in_flight_is_ignored() {
        let mut tui = state();
        submit(&mut tui, "first");
        tui.input.enabled = true;
        assert!(submit(&mut tui, "second").is_empty());
        assert_eq!(tui.transcript.cells().len(), 2);
    }

    #[test]
    fn test_only_first_submission_is_labelled() {
        let mut tui = state();
        submit(&mut tui, "first");
        tui.response = ResponseState::Idle;
        tui.input.enable_and_focus();
        submit(&mut tui, "second");
        assert_eq!(tui.history.labels(), &["first"]);
    }

    #[test]
    fn test_paste_normalizes_newlines_and_tabs() {
        let mut input = InputState::default();
        handle_paste(&mut input, "a\r\n\tb");
        assert_eq!(input.text(), "a\n    b");

        input.disable();
        handle_paste(&mut input, "ignored");
        assert_eq!(input.text(), "a\n    b");
    }
}
