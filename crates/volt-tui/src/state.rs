//! TUI state.
//!
//! `AppState` splits the modal overlay from the rest so the reducer can
//! borrow both halves at once.

use volt_core::stream::{StreamPhase, StreamingRenderer};

use crate::dictation::DictationState;
use crate::events::ResponseReceiver;
use crate::history::HistoryState;
use crate::input::InputState;
use crate::overlays::Overlay;
use crate::suggestions::SuggestionsState;
use crate::transcript::{CellId, TranscriptState};

pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(model: String, dictation_available: bool) -> Self {
        Self {
            tui: TuiState::new(model, dictation_available),
            overlay: None,
        }
    }
}

/// The in-flight model response, if any.
pub enum ResponseState {
    Idle,
    Active {
        /// `None` until the runtime has spawned the request.
        rx: Option<ResponseReceiver>,
        renderer: StreamingRenderer<CellId>,
    },
}

impl ResponseState {
    pub fn is_active(&self) -> bool {
        matches!(self, ResponseState::Active { .. })
    }

    pub fn phase(&self) -> Option<StreamPhase> {
        match self {
            ResponseState::Idle => None,
            ResponseState::Active { renderer, .. } => Some(renderer.phase()),
        }
    }
}

pub struct TuiState {
    pub should_quit: bool,
    pub model: String,
    pub input: InputState,
    pub transcript: TranscriptState,
    pub history: HistoryState,
    pub suggestions: SuggestionsState,
    /// `None` hides dictation entirely.
    pub dictation: Option<DictationState>,
    pub response: ResponseState,
    /// Set by the first submission; hides the suggestion panel.
    pub conversation_started: bool,
    pub spinner_frame: usize,
}

impl TuiState {
    pub fn new(model: String, dictation_available: bool) -> Self {
        Self {
            should_quit: false,
            model,
            input: InputState::default(),
            transcript: TranscriptState::new(),
            history: HistoryState::default(),
            suggestions: SuggestionsState::default(),
            dictation: dictation_available.then(DictationState::default),
            response: ResponseState::Idle,
            conversation_started: false,
            spinner_frame: 0,
        }
    }

    /// Re-arms the composer and dictation after a response settles or fails.
    pub fn finish_response(&mut self) {
        self.response = ResponseState::Idle;
        self.input.enable_and_focus();
        if let Some(dictation) = self.dictation.as_mut() {
            dictation.control_enabled = true;
        }
    }
}
