//! Dictation reducer.

use super::state::{DictationErrorKind, DictationEvent, DictationPhase};
use crate::effects::UiEffect;
use crate::input;
use crate::overlays::OverlayRequest;
use crate::state::TuiState;

const MIC_BLOCKED_TITLE: &str = "Microphone blocked";
const MIC_BLOCKED_MESSAGE: &str = "Microphone access was denied. Allow microphone access for \
     your terminal in the system privacy settings, then try again.";

/// Starts or stops recording. No-op when dictation is unavailable or the
/// control is disabled.
pub fn toggle(tui: &mut TuiState) -> Vec<UiEffect> {
    let Some(dictation) = tui.dictation.as_mut() else {
        return vec![];
    };
    if !dictation.control_enabled {
        return vec![];
    }

    match dictation.phase {
        DictationPhase::Idle => {
            dictation.phase = DictationPhase::Recording;
            vec![UiEffect::StartDictation]
        }
        DictationPhase::Recording => vec![UiEffect::StopDictation],
    }
}

/// Applies a dictation event.
///
/// Only final results reach the composer, each one replacing its text.
/// When the session ends with text in the composer, it is submitted.
pub fn handle_event(
    tui: &mut TuiState,
    event: DictationEvent,
) -> (Vec<UiEffect>, Option<OverlayRequest>) {
    let Some(dictation) = tui.dictation.as_mut() else {
        return (vec![], None);
    };

    match event {
        DictationEvent::Start => {
            dictation.phase = DictationPhase::Recording;
            (vec![], None)
        }
        DictationEvent::Result { .. } if !tui.input.enabled => {
            tracing::debug!("dropping dictation result while a response is in flight");
            (vec![], None)
        }
        DictationEvent::Result { results } => {
            for result in results.iter().filter(|r| r.is_final) {
                tui.input.set_text(&result.transcript);
            }
            (vec![], None)
        }
        DictationEvent::Error(DictationErrorKind::NotAllowed) => {
            tracing::warn!("microphone access denied");
            (
                vec![],
                Some(OverlayRequest::Notice {
                    title: MIC_BLOCKED_TITLE.to_string(),
                    message: MIC_BLOCKED_MESSAGE.to_string(),
                }),
            )
        }
        DictationEvent::Error(kind) => {
            tracing::warn!(error = ?kind, "dictation failed");
            (vec![], None)
        }
        DictationEvent::End => {
            dictation.phase = DictationPhase::Idle;
            let text = tui.input.text();
            if text.trim().is_empty() {
                return (vec![], None);
            }
            (input::submit(tui, &text), None)
        }
    }
}
