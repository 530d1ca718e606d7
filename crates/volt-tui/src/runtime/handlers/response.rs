use futures_util::StreamExt;
use tokio::sync::mpsc;
use volt_core::session::ChatSession;

use crate::events::{ResponseEvent, UiEvent};

/// Buffered chunks between the request task and the UI.
const RESPONSE_CHANNEL_CAPACITY: usize = 64;

/// Starts streaming a reply to `prompt`.
///
/// The returned event hands the receiver to the reducer. Chunks arrive in
/// order and the last event is always `Completed` or `Failed`.
pub fn spawn_response(session: &mut ChatSession, prompt: &str) -> UiEvent {
    let (tx, rx) = mpsc::channel(RESPONSE_CHANNEL_CAPACITY);
    let mut chunks = session.send_message_stream(prompt);

    tokio::spawn(async move {
        while let Some(item) = chunks.next().await {
            match item {
                Ok(text) => {
                    if tx.send(ResponseEvent::Chunk(text)).await.is_err() {
                        tracing::debug!("response receiver dropped");
                        return;
                    }
                }
                Err(e) => {
                    let _ = tx.send(ResponseEvent::Failed(e.to_string())).await;
                    return;
                }
            }
        }
        let _ = tx.send(ResponseEvent::Completed).await;
    });

    UiEvent::ResponseSpawned { rx }
}

#[cfg(test)]
mod tests {
    use volt_core::providers::gemini::{GeminiClient, GeminiConfig};

    use super::*;

    fn unreachable_session() -> ChatSession {
        let config = GeminiConfig {
            api_key: "test".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            model: "gemini-2.5-flash".to_string(),
            max_output_tokens: None,
        };
        ChatSession::new(GeminiClient::new(config), "system".to_string())
    }

    #[tokio::test]
    async fn test_connection_failure_ends_with_failed() {
        let mut session = unreachable_session();
        let UiEvent::ResponseSpawned { mut rx } = spawn_response(&mut session, "hello") else {
            panic!("expected ResponseSpawned");
        };

        let mut received = Vec::new();
        while let Some(event) = rx.recv().await {
            received.push(event);
        }

        assert!(matches!(received.last(), Some(ResponseEvent::Failed(_))));
        assert!(!received.contains(&ResponseEvent::Completed));
    }
}
