use crate::config::Config;
use crate::i18n::LanguageEntry;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const SYSTEM_PROMPT: &str = "Translate the following text precisely. Provide ONLY the translation without any additional explanation.";

/// A translation that could not be produced for one language.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("translation to {language} failed: {cause}")]
pub struct TranslationFailure {
    pub language: String,
    pub cause: String,
}

/// A provider client that could not be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to initialise {client} client: {cause}")]
pub struct ClientInitError {
    pub client: &'static str,
    pub cause: String,
}

/// Translates text into one target language.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        target: &LanguageEntry,
    ) -> std::result::Result<String, TranslationFailure>;
}

/// OpenAI-compatible chat completion request for translation
#[derive(Debug, Serialize)]
struct TranslationRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// Build the user prompt for translation
fn build_translation_user_prompt(text: &str, target_language: &str) -> String {
    format!("Translate the English text: '{}' to {}", text, target_language)
}

/// Trim the model output and drop one pair of enclosing quotes, if present.
///
/// Some models wrap the whole answer in quotes even when told not to.
pub fn clean_translation(raw: &str, strip_quotes: bool) -> String {
    let trimmed = raw.trim();
    if !strip_quotes {
        return trimmed.to_string();
    }

    const PAIRS: &[(char, char)] = &[
        ('"', '"'),
        ('\'', '\''),
        ('\u{201C}', '\u{201D}'),
        ('\u{2018}', '\u{2019}'),
        ('«', '»'),
        ('「', '」'),
    ];

    for (open, close) in PAIRS {
        if let Some(inner) = trimmed
            .strip_prefix(*open)
            .and_then(|rest| rest.strip_suffix(*close))
        {
            return inner.trim().to_string();
        }
    }

    trimmed.to_string()
}

/// Translator backed by an OpenAI-compatible chat completion endpoint (Groq by default).
pub struct ChatTranslator {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
    strip_quotes: bool,
}

impl ChatTranslator {
    /// Build the HTTP client; construction failure is reported, not hidden.
    pub fn new(config: &Config) -> std::result::Result<Self, ClientInitError> {
        Self::with_timeout(config, config.request_timeout())
    }

    pub fn with_timeout(
        config: &Config,
        timeout: Duration,
    ) -> std::result::Result<Self, ClientInitError> {
        if config.api_key.trim().is_empty() {
            return Err(ClientInitError {
                client: "translation",
                cause: "no API key configured".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientInitError {
                client: "translation",
                cause: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_url: config.translation_api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.translation_model.clone(),
            temperature: config.translation_temperature,
            strip_quotes: config.strip_quotes,
        })
    }

    async fn request_translation(&self, text: &str, target_language: &str) -> Result<String> {
        let request = TranslationRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: build_translation_user_prompt(text, target_language),
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send translation request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            anyhow::bail!("Translation API error ({}): {}", status, body);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse translation response")?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .context("Translation response contained no choices")?;

        let translated = clean_translation(&content, self.strip_quotes);
        if translated.is_empty() {
            anyhow::bail!("Translation response was empty");
        }

        Ok(translated)
    }
}

#[async_trait]
impl Translator for ChatTranslator {
    async fn translate(
        &self,
        text: &str,
        target: &LanguageEntry,
    ) -> std::result::Result<String, TranslationFailure> {
        debug!(language = target.code(), model = %self.model, "Requesting translation");

        self.request_translation(text, target.display_name())
            .await
            .map_err(|e| TranslationFailure {
                language: target.code().to_string(),
                cause: format!("{:#}", e),
            })
    }
}
