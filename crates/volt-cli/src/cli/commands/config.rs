//! Config command handlers.

use anyhow::{Context, Result};
use volt_core::config::{Config, paths};

pub fn path() {
    println!("{}", paths::config_path().display());
}

/// Writes the commented template. Never overwrites an existing file.
pub fn init() -> Result<()> {
    let config_path = paths::config_path();
    Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    println!("Set GEMINI_API_KEY or [providers.gemini] api_key before starting a chat.");
    Ok(())
}
