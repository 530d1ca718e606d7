//! UI events consumed by the reducer.

use crossterm::event::Event;
use tokio::sync::mpsc;

use crate::dictation::DictationEvent;

/// Streamed response progress, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEvent {
    Chunk(String),
    Completed,
    Failed(String),
}

/// Receiver for one response's events.
pub type ResponseReceiver = mpsc::Receiver<ResponseEvent>;

#[derive(Debug)]
pub enum UiEvent {
    /// Frame timer; the only event that triggers a repaint.
    Tick,
    /// Prepended to every batch with the current terminal size.
    Frame { width: u16, height: u16 },
    Terminal(Event),
    /// The response task started; its events arrive on `rx`.
    ResponseSpawned { rx: ResponseReceiver },
    Response(ResponseEvent),
    Dictation(DictationEvent),
}
