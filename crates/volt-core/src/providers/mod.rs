//! LLM providers used by volt.

pub mod gemini;
pub mod shared;

pub use shared::{
    ChatMessage, ProviderError, ProviderErrorKind, ProviderResult, ProviderStream, StreamEvent,
    USER_AGENT,
};
