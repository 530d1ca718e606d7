//! Gemini provider (Generative Language API, API key auth).

pub mod api;
pub mod request;
mod sse;

pub use api::{DEFAULT_BASE_URL, GeminiClient, GeminiConfig};
pub use sse::GeminiSseParser;
