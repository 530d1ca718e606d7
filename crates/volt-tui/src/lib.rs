//! Full-screen TUI for volt.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};

use anyhow::Result;
pub use features::{dictation, history, input, suggestions, transcript};
pub use runtime::TuiRuntime;
use volt_core::config::Config;
use volt_core::session::ChatSession;
use volt_core::transcription::TranscriptionSettings;

use crate::transcript::HistoryCell;

/// Runs the interactive chat loop.
///
/// # Errors
/// Returns an error if no terminal is attached or the terminal cannot be
/// set up.
pub async fn run_interactive_chat(config: Config, session: ChatSession) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "Chat mode requires a terminal.\n\
             Use `volt exec --prompt '...'` for non-interactive execution."
        );
    }

    let transcription = detect_dictation(&config);

    let mut err = stderr();
    writeln!(err, "volt")?;
    writeln!(err, "Model: {}", session.model())?;
    err.flush()?;

    let model = session.model().to_string();
    let mut runtime = TuiRuntime::new(session, transcription)?;

    runtime
        .state
        .tui
        .transcript
        .push_cell(HistoryCell::system(format!("Model: {model}")));
    let config_path = volt_core::config::paths::config_path();
    if config_path.exists() {
        runtime
            .state
            .tui
            .transcript
            .push_cell(HistoryCell::system(format!(
                "Config file: {}",
                config_path.display()
            )));
    }

    tokio::task::block_in_place(|| runtime.run())?;

    writeln!(stderr(), "Goodbye!")?;
    Ok(())
}

/// Resolves the dictation capability.
///
/// Dictation is offered only when enabled in config, a transcription
/// provider has credentials, and an input device exists.
fn detect_dictation(config: &Config) -> Option<TranscriptionSettings> {
    if !config.dictation.enabled {
        return None;
    }

    let settings = match TranscriptionSettings::resolve(config) {
        Ok(Some(settings)) => settings,
        Ok(None) => {
            tracing::info!("dictation unavailable: no transcription credentials");
            return None;
        }
        Err(e) => {
            tracing::warn!(error = %e, "dictation unavailable");
            return None;
        }
    };

    if !dictation::capture::input_available() {
        tracing::info!("dictation unavailable: no input device");
        return None;
    }

    Some(settings)
}
