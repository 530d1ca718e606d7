//! Microphone capture with silence detection.
//!
//! Runs on a plain thread: cpal streams are not `Send` on every platform,
//! so the stream lives and dies inside [`record`].

use std::fmt;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy)]
pub struct CaptureLimits {
    /// Silence after speech that ends the recording.
    pub silence_timeout: Duration,
    /// Give up if nobody speaks within this window.
    pub no_speech_timeout: Duration,
    pub max_duration: Duration,
    /// RMS level (0.0..=1.0) that counts as speech.
    pub speech_threshold: f32,
}

impl Default for CaptureLimits {
    fn default() -> Self {
        Self {
            silence_timeout: Duration::from_secs(2),
            no_speech_timeout: Duration::from_secs(8),
            max_duration: Duration::from_secs(60),
            speech_threshold: 0.02,
        }
    }
}

/// Mono 16-bit PCM.
#[derive(Debug, Clone)]
pub struct Recording {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub heard_speech: bool,
}

impl Recording {
    /// Encodes the samples as a WAV file in memory.
    ///
    /// # Errors
    /// Returns an error if the WAV writer fails.
    pub fn to_wav(&self) -> Result<Vec<u8>, hound::Error> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
            for &sample in &self.samples {
                writer.write_sample(sample)?;
            }
            writer.finalize()?;
        }
        Ok(cursor.into_inner())
    }
}

#[derive(Debug)]
pub enum CaptureError {
    NoDevice,
    NotAllowed(String),
    Device(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NoDevice => write!(f, "no audio input device"),
            CaptureError::NotAllowed(msg) => write!(f, "microphone access denied: {msg}"),
            CaptureError::Device(msg) => write!(f, "audio input error: {msg}"),
        }
    }
}

impl std::error::Error for CaptureError {}

fn classify(message: String) -> CaptureError {
    let lower = message.to_lowercase();
    if ["permission", "denied", "not allowed", "not authorized"]
        .iter()
        .any(|needle| lower.contains(needle))
    {
        CaptureError::NotAllowed(message)
    } else {
        CaptureError::Device(message)
    }
}

pub fn input_available() -> bool {
    cpal::default_host().default_input_device().is_some()
}

/// Root-mean-square level of `samples`, normalized to `0.0..=1.0`.
pub fn rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples
        .iter()
        .map(|&s| {
            let v = f64::from(s) / f64::from(i16::MAX);
            v * v
        })
        .sum();
    (sum / samples.len() as f64).sqrt() as f32
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    buffer: Arc<Mutex<Vec<i16>>>,
) -> Result<Stream, CaptureError>
where
    T: SizedSample,
    i16: FromSample<T>,
{
    let channels = usize::from(config.channels.max(1));
    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let mut samples = buffer.lock().unwrap_or_else(PoisonError::into_inner);
                samples.extend(data.chunks(channels).map(|frame| frame[0].to_sample::<i16>()));
            },
            |err| tracing::warn!(error = %err, "audio input stream error"),
            None,
        )
        .map_err(|e| classify(e.to_string()))
}

/// Records from the default input device until `stop` is set, the speaker
/// goes quiet, or a time limit is hit. `on_start` fires once audio flows.
///
/// # Errors
/// Returns an error if no device exists, access is refused, or the stream
/// cannot be opened.
pub fn record(
    stop: &AtomicBool,
    limits: CaptureLimits,
    on_start: impl FnOnce(),
) -> Result<Recording, CaptureError> {
    let device = cpal::default_host()
        .default_input_device()
        .ok_or(CaptureError::NoDevice)?;
    let supported = device
        .default_input_config()
        .map_err(|e| classify(e.to_string()))?;
    let sample_format = supported.sample_format();
    let config = supported.config();
    let sample_rate = config.sample_rate.0;

    let buffer = Arc::new(Mutex::new(Vec::new()));
    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, Arc::clone(&buffer))?,
        SampleFormat::I16 => build_stream::<i16>(&device, &config, Arc::clone(&buffer))?,
        SampleFormat::U16 => build_stream::<u16>(&device, &config, Arc::clone(&buffer))?,
        SampleFormat::I32 => build_stream::<i32>(&device, &config, Arc::clone(&buffer))?,
        other => {
            return Err(CaptureError::Device(format!(
                "unsupported sample format {other}"
            )));
        }
    };
    stream.play().map_err(|e| classify(e.to_string()))?;

    tracing::debug!(sample_rate, ?sample_format, "recording started");
    on_start();

    let started = Instant::now();
    let mut last_voice = started;
    let mut heard_speech = false;
    let mut checked = 0;

    loop {
        thread::sleep(POLL_INTERVAL);
        if stop.load(Ordering::Relaxed) {
            break;
        }
        if started.elapsed() >= limits.max_duration {
            tracing::debug!("recording hit the time limit");
            break;
        }

        let level = {
            let samples = buffer.lock().unwrap_or_else(PoisonError::into_inner);
            let level = rms(&samples[checked..]);
            checked = samples.len();
            level
        };

        if level >= limits.speech_threshold {
            heard_speech = true;
            last_voice = Instant::now();
        } else if heard_speech && last_voice.elapsed() >= limits.silence_timeout {
            break;
        } else if !heard_speech && started.elapsed() >= limits.no_speech_timeout {
            break;
        }
    }

    drop(stream);
    let samples = std::mem::take(&mut *buffer.lock().unwrap_or_else(PoisonError::into_inner));
    tracing::debug!(samples = samples.len(), heard_speech, "recording stopped");

    Ok(Recording {
        samples,
        sample_rate,
        heard_speech,
    })
}
