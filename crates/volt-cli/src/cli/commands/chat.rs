//! Chat command handler.

use std::io::{IsTerminal, Read};

use anyhow::{Context, Result};
use volt_core::config::Config;
use volt_core::session::ChatSession;

use super::exec;

pub async fn run(config: &Config) -> Result<()> {
    // Piped stdin runs a one-shot exec instead.
    if !std::io::stdin().is_terminal() {
        let mut prompt = String::new();
        std::io::stdin().lock().read_to_string(&mut prompt)?;
        let prompt = prompt.trim();
        if prompt.is_empty() {
            anyhow::bail!("No input provided via pipe");
        }
        return exec::run(config, prompt, exec::Output::Text).await;
    }

    // Resolved before the terminal is touched so a missing key is reported
    // on a normal screen.
    let session = ChatSession::from_config(config).context("start chat session")?;

    volt_tui::run_interactive_chat(config.clone(), session)
        .await
        .context("interactive chat failed")?;

    Ok(())
}
