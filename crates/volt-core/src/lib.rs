//! Core volt library (config, providers, chat session, markdown, streaming).

pub mod config;
pub mod logging;
pub mod markdown;
pub mod prompts;
pub mod providers;
pub mod session;
pub mod stream;
pub mod transcription;
