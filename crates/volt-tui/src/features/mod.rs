pub mod dictation;
pub mod history;
pub mod input;
pub mod suggestions;
pub mod transcript;
