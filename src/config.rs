use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Translation provider (OpenAI-compatible chat completions)
    pub api_key: String,
    pub translation_model: String,
    pub translation_api_url: String,
    pub translation_temperature: Option<f32>,
    pub strip_quotes: bool,

    // Speech synthesis provider
    pub tts_api_url: String,

    // Provider clients
    pub request_timeout_secs: u64,

    // Artifacts
    pub output_dir: PathBuf,
    pub cleanup_interval_secs: u64,

    // Language count bounds
    pub min_languages: usize,
    pub max_languages: usize,
    pub default_languages: usize,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            // Translation provider
            api_key: std::env::var("GROQ_API_KEY").context("GROQ_API_KEY not set")?,
            translation_model: std::env::var("TRANSLATION_MODEL")
                .unwrap_or_else(|_| "mixtral-8x7b-32768".to_string()),
            translation_api_url: std::env::var("TRANSLATION_API_URL").unwrap_or_else(|_| {
                "https://api.groq.com/openai/v1/chat/completions".to_string()
            }),
            translation_temperature: std::env::var("TRANSLATION_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok()),
            strip_quotes: std::env::var("STRIP_QUOTES")
                .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true),

            // Speech synthesis provider
            tts_api_url: std::env::var("TTS_API_URL")
                .unwrap_or_else(|_| "https://translate.google.com/translate_tts".to_string()),

            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),

            // Artifacts
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("translations")),
            cleanup_interval_secs: std::env::var("CLEANUP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),

            // Language count bounds (slider range of the web form)
            min_languages: std::env::var("MIN_LANGUAGES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            max_languages: std::env::var("MAX_LANGUAGES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(40),
            default_languages: std::env::var("DEFAULT_LANGUAGES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),

            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that can never serve a request.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            bail!("GROQ_API_KEY is empty");
        }
        if self.max_languages == 0 {
            bail!("MAX_LANGUAGES must be at least 1");
        }
        if self.min_languages > self.max_languages {
            bail!(
                "MIN_LANGUAGES ({}) is greater than MAX_LANGUAGES ({})",
                self.min_languages,
                self.max_languages
            );
        }
        if !(self.min_languages..=self.max_languages).contains(&self.default_languages) {
            bail!(
                "DEFAULT_LANGUAGES ({}) must be between {} and {}",
                self.default_languages,
                self.min_languages,
                self.max_languages
            );
        }
        if self.cleanup_interval_secs == 0 {
            bail!("CLEANUP_INTERVAL_SECS must be greater than zero");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    /// Config with fixed values and a placeholder credential, for tests and tools.
    pub fn for_tests(translation_api_url: &str, tts_api_url: &str, output_dir: PathBuf) -> Self {
        Self {
            api_key: "test-groq-key".to_string(),
            translation_model: "mixtral-8x7b-32768".to_string(),
            translation_api_url: translation_api_url.to_string(),
            translation_temperature: None,
            strip_quotes: true,
            tts_api_url: tts_api_url.to_string(),
            request_timeout_secs: 5,
            output_dir,
            cleanup_interval_secs: 3600,
            min_languages: 5,
            max_languages: 40,
            default_languages: 20,
            port: 8080,
        }
    }
}
