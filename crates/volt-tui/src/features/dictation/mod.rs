//! Voice dictation into the composer.
//!
//! Audio is captured on a background thread (`capture`), uploaded to the
//! configured transcription service, and delivered back to the reducer as
//! [`DictationEvent`]s.

pub mod capture;
mod state;
mod update;

pub use state::{
    DictationErrorKind, DictationEvent, DictationPhase, DictationState, RecognitionResult,
};
pub use update::{handle_event, toggle};
