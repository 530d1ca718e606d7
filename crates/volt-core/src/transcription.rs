//! Speech-to-text through an OpenAI-compatible `/audio/transcriptions` endpoint.

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::config::{Config, ProviderConfig};
use crate::providers::shared::resolve_base_url;

const DEFAULT_OPENAI_MODEL: &str = "whisper-1";
const DEFAULT_MISTRAL_MODEL: &str = "voxtral-mini-latest";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptionProvider {
    OpenAI,
    Mistral,
}

impl TranscriptionProvider {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Some(Self::OpenAI),
            "mistral" => Some(Self::Mistral),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Mistral => "Mistral",
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            Self::OpenAI => DEFAULT_OPENAI_MODEL,
            Self::Mistral => DEFAULT_MISTRAL_MODEL,
        }
    }

    fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAI => DEFAULT_OPENAI_BASE_URL,
            Self::Mistral => DEFAULT_MISTRAL_BASE_URL,
        }
    }

    fn env_prefix(self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI",
            Self::Mistral => "MISTRAL",
        }
    }

    fn provider_config(self, config: &Config) -> &ProviderConfig {
        match self {
            Self::OpenAI => &config.providers.openai,
            Self::Mistral => &config.providers.mistral,
        }
    }

    fn api_key(self, config: &Config) -> Option<String> {
        self.provider_config(config)
            .api_key()
            .map(str::to_string)
            .or_else(|| {
                std::env::var(format!("{}_API_KEY", self.env_prefix()))
                    .ok()
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty())
            })
    }
}

/// Fully resolved transcription endpoint.
#[derive(Debug, Clone)]
pub struct TranscriptionSettings {
    pub provider: TranscriptionProvider,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub language: Option<String>,
}

impl TranscriptionSettings {
    /// Resolves settings from config and environment.
    ///
    /// Provider: `[transcription] provider` if set, otherwise the first of
    /// OpenAI, Mistral with a usable key. Returns `Ok(None)` when no
    /// provider has credentials.
    ///
    /// # Errors
    /// Returns an error for an unknown provider name or an invalid base URL.
    pub fn resolve(config: &Config) -> Result<Option<Self>> {
        let explicit = config
            .transcription
            .provider
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let provider = match explicit {
            Some(name) => TranscriptionProvider::parse(name)
                .with_context(|| format!("Unknown transcription provider: {name}"))?,
            None => {
                if TranscriptionProvider::OpenAI.api_key(config).is_some() {
                    TranscriptionProvider::OpenAI
                } else if TranscriptionProvider::Mistral.api_key(config).is_some() {
                    TranscriptionProvider::Mistral
                } else {
                    return Ok(None);
                }
            }
        };

        let Some(api_key) = provider.api_key(config) else {
            return Ok(None);
        };

        let base_url = resolve_base_url(
            provider.provider_config(config).base_url.as_deref(),
            &format!("{}_BASE_URL", provider.env_prefix()),
            provider.default_base_url(),
            provider.name(),
        )?;

        let model = config
            .transcription
            .model
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(provider.default_model())
            .to_string();

        let language = config
            .transcription
            .language
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        Ok(Some(Self {
            provider,
            api_key,
            base_url,
            model,
            language,
        }))
    }

    /// Uploads `bytes` and returns the trimmed transcript, or `None` if the
    /// service heard nothing.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response is not a
    /// transcription payload.
    pub async fn transcribe(
        &self,
        client: &reqwest::Client,
        bytes: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> Result<Option<String>> {
        let provider_name = self.provider.name();
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime_type)?;

        let mut form = reqwest::multipart::Form::new()
            .text("model", self.model.clone())
            .part("file", part);

        if let Some(lang) = &self.language {
            form = form.text("language", lang.clone());
        }

        let url = format!("{}/audio/transcriptions", self.base_url);
        tracing::debug!(provider = provider_name, model = %self.model, "uploading dictation audio");

        let response = client
            .post(url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("{provider_name} transcription request failed"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "{provider_name} transcription failed: {status} {body}"
            ));
        }

        #[derive(Deserialize)]
        struct TranscriptionResponse {
            text: String,
        }

        let payload: TranscriptionResponse = response
            .json()
            .await
            .context("Failed to decode transcription response")?;

        let trimmed = payload.text.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn settings_for(base_url: String) -> TranscriptionSettings {
        TranscriptionSettings {
            provider: TranscriptionProvider::OpenAI,
            api_key: "sk-test".to_string(),
            base_url,
            model: "whisper-1".to_string(),
            language: Some("en".to_string()),
        }
    }

    #[test]
    fn test_explicit_provider_uses_config_key_and_defaults() {
        let mut config = Config::default();
        config.transcription.provider = Some(" Mistral ".to_string());
        config.providers.mistral.api_key = Some("mk".to_string());
        config.providers.mistral.base_url = Some("http://localhost:9000/v1/".to_string());

        let settings = TranscriptionSettings::resolve(&config).unwrap().unwrap();
        assert_eq!(settings.provider, TranscriptionProvider::Mistral);
        assert_eq!(settings.api_key, "mk");
        assert_eq!(settings.model, "voxtral-mini-latest");
        assert!(settings.language.is_none());
    }

    #[test]
    fn test_model_and_language_overrides() {
        let mut config = Config::default();
        config.transcription.provider = Some("openai".to_string());
        config.transcription.model = Some("gpt-4o-transcribe".to_string());
        config.transcription.language = Some("pt".to_string());
        config.providers.openai.api_key = Some("sk".to_string());
        config.providers.openai.base_url = Some("http://localhost:9000/v1".to_string());

        let settings = TranscriptionSettings::resolve(&config).unwrap().unwrap();
        assert_eq!(settings.model, "gpt-4o-transcribe");
        assert_eq!(settings.language.as_deref(), Some("pt"));
    }

    #[test]
    fn test_unknown_provider_is_error() {
        let mut config = Config::default();
        config.transcription.provider = Some("whisperer".to_string());
        let err = TranscriptionSettings::resolve(&config).unwrap_err();
        assert!(err.to_string().contains("whisperer"));
    }

    #[tokio::test]
    async fn test_transcribe_posts_multipart_and_trims() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": " hello world \n"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let settings = settings_for(server.uri());
        let text = settings
            .transcribe(&reqwest::Client::new(), vec![0; 64], "dictation.wav", "audio/wav")
            .await
            .unwrap();
        assert_eq!(text.as_deref(), Some("hello world"));
    }

    #[tokio::test]
    async fn test_transcribe_blank_and_error_responses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "  "})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let settings = settings_for(server.uri());
        let client = reqwest::Client::new();
        let blank = settings
            .transcribe(&client, vec![0; 8], "dictation.wav", "audio/wav")
            .await
            .unwrap();
        assert!(blank.is_none());

        let err = settings
            .transcribe(&client, vec![0; 8], "dictation.wav", "audio/wav")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("OpenAI transcription failed: 401"));
    }
}
