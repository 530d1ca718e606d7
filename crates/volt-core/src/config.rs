//! Configuration management for volt.
//!
//! Loads configuration from ${VOLT_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod paths {
    //! Path resolution for volt configuration and data directories.
    //!
    //! VOLT_HOME resolution order:
    //! 1. VOLT_HOME environment variable (if set)
    //! 2. ~/.config/volt (default)

    use std::path::PathBuf;

    /// Returns the volt home directory.
    ///
    /// Checks VOLT_HOME env var first, falls back to ~/.config/volt
    /// (or `./.volt` when no home directory can be determined).
    pub fn volt_home() -> PathBuf {
        if let Ok(home) = std::env::var("VOLT_HOME")
            && !home.trim().is_empty()
        {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".volt"),
            |h| h.join(".config").join("volt"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        volt_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        volt_home().join("logs")
    }
}

/// Credentials and endpoint overrides for one API provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    /// Returns the configured API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Per-provider configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub gemini: ProviderConfig,
    pub openai: ProviderConfig,
    pub mistral: ProviderConfig,
}

/// Transcription configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Transcription provider: "openai" or "mistral"
    pub provider: Option<String>,
    /// Model to use for transcription (provider-specific)
    pub model: Option<String>,
    /// Language hint (ISO 639-1 code like "en", "pt", etc.)
    pub language: Option<String>,
}

/// Voice input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictationConfig {
    pub enabled: bool,
}

impl Default for DictationConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The Gemini model to use
    pub model: String,
    /// Maximum output tokens per response (model default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Replacement for the built-in system instruction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    pub providers: ProvidersConfig,
    pub transcription: TranscriptionConfig,
    pub dictation: DictationConfig,
}

impl Config {
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash";

    /// Loads configuration from the default path.
    /// Returns defaults if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the system instruction the chat session is configured with.
    pub fn effective_system_instruction(&self) -> String {
        self.system_instruction
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| crate::prompts::SYSTEM_INSTRUCTION.trim())
            .to_string()
    }

    /// Writes the default config template to `path`.
    ///
    /// # Errors
    /// Fails if a file already exists at `path` or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: Self::DEFAULT_MODEL.to_string(),
            max_output_tokens: None,
            system_instruction: None,
            providers: ProvidersConfig::default(),
            transcription: TranscriptionConfig::default(),
            dictation: DictationConfig::default(),
        }
    }
}

fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}
