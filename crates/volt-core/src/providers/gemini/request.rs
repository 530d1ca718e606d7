//! Request building and error classification for the Gemini API.

use serde_json::{Value, json};

use crate::providers::{ChatMessage, ProviderError, ProviderErrorKind};

/// Classifies a reqwest transport error into a provider error.
pub fn classify_reqwest_error(e: &reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::timeout(format!("Request timed out: {e}"))
    } else if e.is_connect() {
        ProviderError::timeout(format!("Connection failed: {e}"))
    } else if e.is_request() {
        ProviderError::new(ProviderErrorKind::HttpStatus, format!("Request error: {e}"))
    } else {
        ProviderError::new(ProviderErrorKind::HttpStatus, format!("Network error: {e}"))
    }
}

/// Builds Gemini-format `contents` from the conversation history.
///
/// Empty turns are skipped; Gemini rejects parts without text.
pub fn build_contents(messages: &[ChatMessage]) -> Vec<Value> {
    messages
        .iter()
        .filter(|msg| !msg.content.is_empty())
        .map(|msg| {
            let role = if msg.role == "model" { "model" } else { "user" };
            json!({
                "role": role,
                "parts": [{ "text": msg.content }],
            })
        })
        .collect()
}

/// Builds a `streamGenerateContent` request body.
pub fn build_gemini_request(
    messages: &[ChatMessage],
    system: Option<&str>,
    max_output_tokens: Option<u32>,
) -> Value {
    let mut request = json!({
        "contents": build_contents(messages),
    });

    if let Some(prompt) = system
        && !prompt.trim().is_empty()
    {
        request["system_instruction"] = json!({
            "parts": [{"text": prompt}]
        });
    }

    if let Some(max) = max_output_tokens
        && max > 0
    {
        request["generationConfig"] = json!({ "maxOutputTokens": max });
    }

    request
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_includes_history_and_system_instruction() {
        let messages = vec![
            ChatMessage::user("Need a 5V rail"),
            ChatMessage::model("Use a buck converter."),
            ChatMessage::user("What about heat?"),
        ];
        let request = build_gemini_request(&messages, Some("You design circuits."), None);

        let contents = request["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["parts"][0]["text"], "What about heat?");
        assert_eq!(
            request["system_instruction"]["parts"][0]["text"],
            "You design circuits."
        );
        assert!(request.get("generationConfig").is_none());
    }

    #[test]
    fn test_request_skips_blank_system_and_empty_turns() {
        let messages = vec![ChatMessage::user("hi"), ChatMessage::model("")];
        let request = build_gemini_request(&messages, Some("   "), Some(1024));

        assert!(request.get("system_instruction").is_none());
        assert_eq!(request["contents"].as_array().unwrap().len(), 1);
        assert_eq!(request["generationConfig"]["maxOutputTokens"], 1024);
    }
}
