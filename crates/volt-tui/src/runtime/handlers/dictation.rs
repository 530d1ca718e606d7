use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tokio::runtime::Handle;
use volt_core::transcription::TranscriptionSettings;

use crate::dictation::capture::{self, CaptureError, CaptureLimits};
use crate::dictation::{DictationErrorKind, DictationEvent, RecognitionResult};
use crate::events::UiEvent;
use crate::runtime::inbox::UiEventSender;

const DICTATION_FILENAME: &str = "dictation.wav";
const DICTATION_MIME: &str = "audio/wav";

/// Records one utterance on a capture thread and transcribes it.
///
/// Events go to `inbox`: `Start` once audio flows, then at most one
/// `Result` or `Error`, and always a final `End`. Setting the returned flag
/// stops the recording early; what was captured so far is still
/// transcribed.
///
/// # Errors
/// Returns an error if the capture thread cannot be spawned.
pub fn start_dictation(
    settings: TranscriptionSettings,
    http: reqwest::Client,
    inbox: UiEventSender,
) -> std::io::Result<Arc<AtomicBool>> {
    let stop = Arc::new(AtomicBool::new(false));
    let handle = Handle::try_current();
    let thread_stop = Arc::clone(&stop);

    std::thread::Builder::new()
        .name("volt-dictation".to_string())
        .spawn(move || {
            let send = |event| {
                let _ = inbox.send(UiEvent::Dictation(event));
            };
            let outcome = match handle {
                Ok(handle) => {
                    capture_and_transcribe(&settings, &http, &handle, &thread_stop, &send)
                }
                Err(e) => DictationEvent::Error(DictationErrorKind::Transcription(e.to_string())),
            };
            send(outcome);
            send(DictationEvent::End);
        })?;

    Ok(stop)
}

fn capture_and_transcribe(
    settings: &TranscriptionSettings,
    http: &reqwest::Client,
    handle: &Handle,
    stop: &AtomicBool,
    send: &impl Fn(DictationEvent),
) -> DictationEvent {
    let recording = match capture::record(stop, CaptureLimits::default(), || {
        send(DictationEvent::Start);
    }) {
        Ok(recording) => recording,
        Err(e) => return DictationEvent::Error(capture_error_kind(e)),
    };

    if !recording.heard_speech {
        return DictationEvent::Error(DictationErrorKind::NoSpeech);
    }

    let wav = match recording.to_wav() {
        Ok(wav) => wav,
        Err(e) => {
            return DictationEvent::Error(DictationErrorKind::AudioCapture(e.to_string()));
        }
    };

    tracing::debug!(
        samples = recording.samples.len(),
        sample_rate = recording.sample_rate,
        "transcribing dictation"
    );
    match handle.block_on(settings.transcribe(http, wav, DICTATION_FILENAME, DICTATION_MIME)) {
        Ok(Some(transcript)) => DictationEvent::Result {
            results: vec![RecognitionResult {
                transcript,
                is_final: true,
            }],
        },
        Ok(None) => DictationEvent::Error(DictationErrorKind::NoSpeech),
        Err(e) => DictationEvent::Error(DictationErrorKind::Transcription(format!("{e:#}"))),
    }
}

fn capture_error_kind(error: CaptureError) -> DictationErrorKind {
    match error {
        CaptureError::NotAllowed(_) => DictationErrorKind::NotAllowed,
        CaptureError::NoDevice | CaptureError::Device(_) => {
            DictationErrorKind::AudioCapture(error.to_string())
        }
    }
}
