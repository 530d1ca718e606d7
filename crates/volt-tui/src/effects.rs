//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! The reducer never performs I/O or spawns tasks directly.

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Send `prompt` through the chat session and stream the reply.
    StartResponse { prompt: String },

    /// Close the in-flight turn in the chat session.
    ///
    /// `None` means the response failed and the user turn is dropped.
    CompleteTurn { reply: Option<String> },

    /// Begin recording from the default input device.
    StartDictation,

    /// Stop the active recording and transcribe what was captured.
    StopDictation,
}
