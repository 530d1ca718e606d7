//! Gemini API key provider (Generative Language API).

use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue};

use super::request::{build_gemini_request, classify_reqwest_error};
use super::sse::GeminiSseParser;
use crate::config::Config;
use crate::providers::shared::{resolve_api_key, resolve_base_url};
use crate::providers::{ChatMessage, ProviderError, ProviderStream};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_output_tokens: Option<u32>,
}

impl GeminiConfig {
    /// Creates a new config from the loaded config file and environment.
    ///
    /// Authentication resolution order:
    /// 1. `api_key` in `[providers.gemini]`
    /// 2. `GEMINI_API_KEY` environment variable
    ///
    /// `GEMINI_BASE_URL` overrides the configured base URL.
    ///
    /// # Errors
    /// Returns an error if no API key is available or the base URL is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = &config.providers.gemini;
        let api_key = resolve_api_key(provider.api_key(), "GEMINI_API_KEY", "gemini")?;
        let base_url = resolve_base_url(
            provider.base_url.as_deref(),
            "GEMINI_BASE_URL",
            DEFAULT_BASE_URL,
            "Gemini",
        )?;

        Ok(Self {
            api_key,
            base_url,
            model: config.model.clone(),
            max_output_tokens: config.max_output_tokens,
        })
    }
}

/// Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Sends the conversation and returns the streamed response events.
    ///
    /// # Errors
    /// Returns a `ProviderError` if the request cannot be sent or the API
    /// answers with a non-success status.
    pub async fn send_messages_stream(
        &self,
        messages: &[ChatMessage],
        system: Option<&str>,
    ) -> Result<ProviderStream, ProviderError> {
        let request = build_gemini_request(messages, system, self.config.max_output_tokens);
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.config.base_url, self.config.model
        );

        tracing::debug!(model = %self.config.model, turns = messages.len(), "sending gemini request");

        let response = self
            .http
            .post(&url)
            .headers(build_headers(&self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "gemini request failed");
            return Err(ProviderError::http_status(status.as_u16(), &error_body));
        }

        let byte_stream = Box::pin(response.bytes_stream());
        Ok(Box::pin(GeminiSseParser::new(byte_stream)))
    }
}

fn build_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-goog-api-key",
        HeaderValue::from_str(api_key).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    headers.insert("accept", HeaderValue::from_static("text/event-stream"));
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    headers.insert(
        "user-agent",
        HeaderValue::from_static(crate::providers::shared::USER_AGENT),
    );
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    #[test]
    fn test_from_config_uses_configured_key_and_model() {
        let mut config = Config::default();
        config.model = "gemini-2.5-pro".to_string();
        config.max_output_tokens = Some(2048);
        config.providers.gemini = ProviderConfig {
            api_key: Some("config-key".to_string()),
            base_url: Some("http://127.0.0.1:9/v1beta".to_string()),
        };

        let gemini = GeminiConfig::from_config(&config).unwrap();
        assert_eq!(gemini.api_key, "config-key");
        assert_eq!(gemini.model, "gemini-2.5-pro");
        assert_eq!(gemini.max_output_tokens, Some(2048));
    }

    #[test]
    fn test_headers_carry_api_key() {
        let headers = build_headers("abc123");
        assert_eq!(headers["x-goog-api-key"], "abc123");
        assert_eq!(headers["accept"], "text/event-stream");
        assert!(
            headers["user-agent"]
                .to_str()
                .unwrap()
                .starts_with("volt/")
        );
    }
}
