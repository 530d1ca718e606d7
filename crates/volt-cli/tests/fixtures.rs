//! Gemini SSE fixtures for integration tests.

#![allow(dead_code)]

use serde_json::json;
use wiremock::ResponseTemplate;

pub const STREAM_PATH: &str = "/models/gemini-2.5-flash:streamGenerateContent";

/// One `data:` event per text part; the last one carries `finishReason`.
pub fn text_sse(parts: &[&str]) -> String {
    let mut body = String::new();
    for (idx, text) in parts.iter().enumerate() {
        let mut candidate = json!({"content": {"role": "model", "parts": [{"text": text}]}});
        if idx + 1 == parts.len() {
            candidate["finishReason"] = json!("STOP");
        }
        body.push_str(&format!("data: {}\n\n", json!({"candidates": [candidate]})));
    }
    body
}

/// An SSE body that delivers some text and then an in-stream error.
pub fn error_after_text_sse(text: &str) -> String {
    let mut body = format!(
        "data: {}\n\n",
        json!({"candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]})
    );
    body.push_str(&format!(
        "data: {}\n\n",
        json!({"error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}})
    ));
    body
}

pub fn sse_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .set_body_string(body.to_string())
}
