//! Chat session: fixed system instruction + model, multi-turn history.

use anyhow::Result;
use futures_util::stream::{self, BoxStream};
use futures_util::{StreamExt, TryStreamExt};

use crate::config::Config;
use crate::providers::gemini::{GeminiClient, GeminiConfig};
use crate::providers::{ChatMessage, ProviderError, ProviderResult, StreamEvent};

/// Stream of incremental response text for one message.
pub type ChunkStream = BoxStream<'static, ProviderResult<String>>;

/// A conversation with the model.
///
/// The session is configured once; every message sent through it carries the
/// same system instruction and the turns exchanged so far.
pub struct ChatSession {
    client: GeminiClient,
    system_instruction: String,
    history: Vec<ChatMessage>,
}

impl ChatSession {
    /// Builds a session from the loaded config.
    ///
    /// # Errors
    /// Returns an error if no Gemini credential can be resolved.
    pub fn from_config(config: &Config) -> Result<Self> {
        let gemini = GeminiConfig::from_config(config)?;
        Ok(Self::new(
            GeminiClient::new(gemini),
            config.effective_system_instruction(),
        ))
    }

    pub fn new(client: GeminiClient, system_instruction: String) -> Self {
        Self {
            client,
            system_instruction,
            history: Vec::new(),
        }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Records the user turn and returns the response chunk stream.
    ///
    /// The request is sent when the stream is first polled. Request failures
    /// and in-stream error events both surface as `Err` items.
    pub fn send_message_stream(&mut self, message: &str) -> ChunkStream {
        self.history.push(ChatMessage::user(message));

        let client = self.client.clone();
        let messages = self.history.clone();
        let system = self.system_instruction.clone();

        let request = async move { client.send_messages_stream(&messages, Some(&system)).await };

        stream::once(request)
            .try_flatten()
            .try_filter_map(|event| async move { event_text(event) })
            .boxed()
    }

    /// Closes the in-flight turn.
    ///
    /// `Some(reply)` records the model turn. `None` drops the dangling user
    /// turn so a failed exchange is not replayed on the next request.
    pub fn complete_turn(&mut self, reply: Option<String>) {
        match reply {
            Some(text) => self.history.push(ChatMessage::model(text)),
            None => {
                if self.history.last().is_some_and(|msg| msg.role == "user") {
                    self.history.pop();
                }
            }
        }
    }
}

fn event_text(event: StreamEvent) -> ProviderResult<Option<String>> {
    match event {
        StreamEvent::TextDelta { text } => Ok(Some(text)),
        StreamEvent::Error {
            error_type,
            message,
        } => Err(ProviderError::api_error(&error_type, &message)),
        StreamEvent::MessageCompleted { finish_reason } => {
            tracing::debug!(%finish_reason, "response completed");
            Ok(None)
        }
    }
}
