//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! This is the Elm runtime boundary. The reducer stays pure and returns
//! effects; every side effect happens here or in `handlers/`.
//!
//! Background work reports back through two channels:
//! - the active response's receiver, drained while a reply streams;
//! - the inbox, which handlers such as dictation push events into.

mod handlers;
mod inbox;

use std::io::Stdout;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use volt_core::session::ChatSession;
use volt_core::transcription::TranscriptionSettings;

use crate::dictation::{DictationErrorKind, DictationEvent, DictationState};
use crate::effects::UiEffect;
use crate::events::{ResponseEvent, ResponseReceiver, UiEvent};
use crate::state::{AppState, ResponseState};
use crate::{render, terminal, update};

/// Frame cadence while something is animating (~60fps).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll timeout when nothing is happening.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen chat runtime.
///
/// Terminal state is restored on drop and on panic.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    session: ChatSession,
    /// `None` when dictation is unavailable.
    transcription: Option<TranscriptionSettings>,
    http: reqwest::Client,
    /// Stop flag of the recording in progress.
    dictation_stop: Option<Arc<AtomicBool>>,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
    /// Recent terminal input keeps the loop at frame cadence.
    last_terminal_event: Instant,
}

impl TuiRuntime {
    /// Enters the alternate screen and builds initial state.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(session: ChatSession, transcription: Option<TranscriptionSettings>) -> Result<Self> {
        // Before entering the alternate screen.
        terminal::install_panic_hook();

        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        let state = AppState::new(session.model().to_string(), transcription.is_some());
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let now = Instant::now();
        Ok(Self {
            terminal,
            state,
            session,
            transcription,
            http: reqwest::Client::new(),
            dictation_stop: None,
            inbox_tx,
            inbox_rx,
            last_tick: now,
            last_terminal_event: now,
        })
    }

    /// Runs until the user quits.
    ///
    /// # Errors
    /// Returns an error if drawing or reading terminal events fails.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;
        let result = self.event_loop();
        let _ = terminal::disable_input_features();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.tui.should_quit {
            let mut events = self.collect_events()?;

            // Layout and scroll bookkeeping run before the batch's other events.
            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                if matches!(&event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = Instant::now();
                }
                // Only Tick repaints, which caps the frame rate at tick cadence.
                if matches!(&event, UiEvent::Tick) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let recording = self
            .state
            .tui
            .dictation
            .as_ref()
            .is_some_and(DictationState::is_recording);
        let needs_fast_poll = self.state.tui.response.is_active()
            || recording
            || self.last_terminal_event.elapsed() < IDLE_POLL_DURATION;
        let tick_interval = if needs_fast_poll {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        self.collect_response_events(&mut events);
        self.collect_inbox_events(&mut events);

        // Block until the next tick unless there is already work queued.
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    /// Drains whatever the response task has produced so far.
    fn collect_response_events(&mut self, events: &mut Vec<UiEvent>) {
        if let ResponseState::Active { rx: Some(rx), .. } = &mut self.state.tui.response {
            drain_response_events(rx, events);
        }
    }

    fn collect_inbox_events(&mut self, events: &mut Vec<UiEvent>) {
        while let Ok(event) = self.inbox_rx.try_recv() {
            events.push(event);
        }
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn dispatch_event(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        if !effects.is_empty() {
            self.execute_effects(effects);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.stop_dictation();
                self.state.tui.should_quit = true;
            }
            UiEffect::StartResponse { prompt } => {
                let event = handlers::spawn_response(&mut self.session, &prompt);
                self.dispatch_event(event);
            }
            UiEffect::CompleteTurn { reply } => {
                self.session.complete_turn(reply);
            }
            UiEffect::StartDictation => {
                let Some(settings) = self.transcription.clone() else {
                    return;
                };
                let started =
                    handlers::start_dictation(settings, self.http.clone(), self.inbox_tx.clone());
                match started {
                    Ok(stop) => self.dictation_stop = Some(stop),
                    Err(e) => {
                        tracing::error!(error = %e, "failed to start dictation");
                        self.dispatch_event(UiEvent::Dictation(DictationEvent::Error(
                            DictationErrorKind::AudioCapture(e.to_string()),
                        )));
                        self.dispatch_event(UiEvent::Dictation(DictationEvent::End));
                    }
                }
            }
            UiEffect::StopDictation => self.stop_dictation(),
        }
    }

    fn stop_dictation(&mut self) {
        if let Some(stop) = self.dictation_stop.take() {
            stop.store(true, Ordering::SeqCst);
        }
    }
}

/// Moves every queued response event into `events`.
///
/// The task always ends with Completed or Failed, so a bare disconnect means
/// it died and is reported as a failure.
fn drain_response_events(rx: &mut ResponseReceiver, events: &mut Vec<UiEvent>) {
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(UiEvent::Response(event)),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                if !events.iter().any(is_terminal_response_event) {
                    events.push(UiEvent::Response(ResponseEvent::Failed(
                        "response task ended unexpectedly".to_string(),
                    )));
                }
                break;
            }
        }
    }
}

fn is_terminal_response_event(event: &UiEvent) -> bool {
    matches!(event, UiEvent::Response(ResponseEvent::Completed | ResponseEvent::Failed(_)))
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        self.stop_dictation();
        let _ = terminal::restore_terminal();
    }
}
