#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictationPhase {
    Idle,
    Recording,
}

/// Present only when dictation is available; `None` in `TuiState` hides
/// the control entirely.
#[derive(Debug, Clone)]
pub struct DictationState {
    pub phase: DictationPhase,
    /// Cleared while a response is in flight.
    pub control_enabled: bool,
}

impl Default for DictationState {
    fn default() -> Self {
        Self {
            phase: DictationPhase::Idle,
            control_enabled: true,
        }
    }
}

impl DictationState {
    pub fn is_recording(&self) -> bool {
        self.phase == DictationPhase::Recording
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    pub transcript: String,
    pub is_final: bool,
}

impl RecognitionResult {
    pub fn final_text(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            is_final: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictationErrorKind {
    /// Microphone access refused by the OS.
    NotAllowed,
    /// Nothing intelligible was captured.
    NoSpeech,
    AudioCapture(String),
    Transcription(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictationEvent {
    /// Recording began.
    Start,
    Result { results: Vec<RecognitionResult> },
    Error(DictationErrorKind),
    /// Always the last event of a session, after any error.
    End,
}
