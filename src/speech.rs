use crate::artifacts::{ArtifactRef, ArtifactStore};
use crate::config::Config;
use crate::i18n::LanguageEntry;
use crate::translation::ClientInitError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, info};

/// Google Translate's TTS endpoint rejects requests longer than this (in chars)
const MAX_CHUNK_CHARS: usize = 100;

/// Characters of source text kept in an artifact file name
const SNIPPET_CHARS: usize = 24;

/// Speech could not be produced or stored for one language.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("speech synthesis for {language} failed: {cause}")]
pub struct SynthesisFailure {
    pub language: String,
    pub cause: String,
}

/// Raw text-to-speech provider: text in, MP3 bytes out.
#[async_trait]
pub trait TtsProvider: Send + Sync {
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>>;
}

/// Speech adapter seen by the pipeline: synthesizes and persists one clip.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        text: &str,
        language: &LanguageEntry,
    ) -> std::result::Result<ArtifactRef, SynthesisFailure>;
}

/// TTS through the Google Translate speech endpoint.
pub struct GoogleTranslateTts {
    client: reqwest::Client,
    api_url: String,
}

impl GoogleTranslateTts {
    pub fn new(config: &Config) -> std::result::Result<Self, ClientInitError> {
        Self::with_timeout(&config.tts_api_url, config.request_timeout())
    }

    pub fn with_timeout(
        api_url: &str,
        timeout: Duration,
    ) -> std::result::Result<Self, ClientInitError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientInitError {
                client: "speech",
                cause: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
        })
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        language_code: &str,
        index: usize,
        total: usize,
    ) -> Result<Vec<u8>> {
        let index = index.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", language_code),
                ("total", total.as_str()),
                ("idx", index.as_str()),
                ("textlen", textlen.as_str()),
                ("client", "tw-ob"),
            ])
            .send()
            .await
            .context("Failed to send speech request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Speech API error ({}): {}", status, body);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read speech response")?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl TtsProvider for GoogleTranslateTts {
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>> {
        let chunks = split_into_chunks(text, MAX_CHUNK_CHARS);
        debug!(
            language = language_code,
            chunk_count = chunks.len(),
            text_length = text.len(),
            "Requesting speech"
        );

        // MP3 frames concatenate cleanly, so chunks are appended in order
        let mut audio = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            let bytes = self
                .fetch_chunk(chunk, language_code, index, chunks.len())
                .await?;
            audio.extend(bytes);
        }

        Ok(audio)
    }
}

/// Split text into pieces of at most `max_chars` characters, preferring
/// whitespace boundaries. Words longer than the limit are cut by characters.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { word_len + 1 };
        if current_len + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// File-name stem for a clip: a short sanitized snippet of the text plus the language code.
///
/// Non-ASCII scripts sanitize to nothing, in which case the stem is just "clip".
pub fn artifact_stem(text: &str, language_code: &str) -> String {
    static SEPARATORS: OnceLock<regex::Regex> = OnceLock::new();
    let separators =
        SEPARATORS.get_or_init(|| regex::Regex::new(r"[^a-z0-9]+").expect("valid regex"));
    let lowered: String = text.to_lowercase().chars().take(SNIPPET_CHARS).collect();
    let snippet = separators.replace_all(&lowered, "-");
    let snippet = snippet.trim_matches('-');
    let snippet = if snippet.is_empty() { "clip" } else { snippet };

    let code: String = language_code
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();

    format!("{}_{}", snippet, code)
}

/// Synthesizes speech with a provider and stores the clip in the artifact store.
pub struct SpeechAdapter {
    provider: Arc<dyn TtsProvider>,
    store: ArtifactStore,
}

impl SpeechAdapter {
    pub fn new(provider: Arc<dyn TtsProvider>, store: ArtifactStore) -> Self {
        Self { provider, store }
    }
}

#[async_trait]
impl SpeechSynthesizer for SpeechAdapter {
    async fn synthesize(
        &self,
        text: &str,
        language: &LanguageEntry,
    ) -> std::result::Result<ArtifactRef, SynthesisFailure> {
        let failure = |cause: String| SynthesisFailure {
            language: language.code().to_string(),
            cause,
        };

        let audio = self
            .provider
            .synthesize(text, language.code())
            .await
            .map_err(|e| failure(format!("{:#}", e)))?;

        if audio.is_empty() {
            return Err(failure("provider returned no audio".to_string()));
        }

        let artifact = self
            .store
            .save(&artifact_stem(text, language.code()), &audio)
            .await
            .map_err(|e| failure(e.to_string()))?;

        info!(
            language = language.code(),
            artifact = %artifact,
            audio_size_bytes = audio.len(),
            "Speech clip stored"
        );

        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    struct FixedTts(std::result::Result<Vec<u8>, String>);

    #[async_trait]
    impl TtsProvider for FixedTts {
        async fn synthesize(&self, _text: &str, _language_code: &str) -> Result<Vec<u8>> {
            self.0.clone().map_err(|e| anyhow::anyhow!(e))
        }
    }

    fn french() -> LanguageEntry {
        LanguageEntry::new("fr", "French")
    }

    // ==================== split_into_chunks Tests ====================

    #[test]
    fn test_split_short_text_single_chunk() {
        assert_eq!(split_into_chunks("Bonjour le monde", 100), vec!["Bonjour le monde"]);
    }

    #[test]
    fn test_split_empty_text() {
        assert!(split_into_chunks("   ", 100).is_empty());
    }

    #[test]
    fn test_split_respects_limit_and_word_boundaries() {
        let text = "word ".repeat(60);
        let chunks = split_into_chunks(&text, 100);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100, "chunk too long: {}", chunk.len());
            assert!(!chunk.starts_with(' ') && !chunk.ends_with(' '));
        }
        assert_eq!(chunks.join(" ").split_whitespace().count(), 60);
    }

    #[test]
    fn test_split_cuts_overlong_word() {
        let text = "a".repeat(250);
        let chunks = split_into_chunks(&text, 100);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 50);
    }

    #[test]
    fn test_split_counts_characters_not_bytes() {
        // 40 three-byte characters per word
        let word = "あ".repeat(40);
        let text = format!("{} {}", word, word);
        let chunks = split_into_chunks(&text, 100);
        assert_eq!(chunks.len(), 1);
    }

    // ==================== artifact_stem Tests ====================

    #[test]
    fn test_artifact_stem_sanitizes() {
        assert_eq!(artifact_stem("Bonjour, le monde!", "fr"), "bonjour-le-monde_fr");
    }

    #[test]
    fn test_artifact_stem_truncates() {
        let stem = artifact_stem(&"abc ".repeat(50), "de");
        assert!(stem.len() <= SNIPPET_CHARS + 3);
        assert!(stem.ends_with("_de"));
    }

    #[test]
    fn test_artifact_stem_non_latin_script() {
        assert_eq!(artifact_stem("你好世界", "zh"), "clip_zh");
    }

    #[test]
    fn test_artifact_stem_strips_unsafe_code_chars() {
        assert_eq!(artifact_stem("hi", "../x"), "hi_x");
    }

    // ==================== SpeechAdapter Tests ====================

    #[tokio::test]
    async fn test_adapter_stores_audio() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path());
        let adapter = SpeechAdapter::new(Arc::new(FixedTts(Ok(vec![7, 8, 9]))), store.clone());

        let artifact = adapter.synthesize("Bonjour", &french()).await.unwrap();

        assert!(artifact.as_str().starts_with("bonjour_fr_"));
        assert_eq!(store.read(&artifact).await.unwrap(), vec![7, 8, 9]);
    }

    #[tokio::test]
    async fn test_adapter_provider_error_is_failure() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path());
        let adapter = SpeechAdapter::new(
            Arc::new(FixedTts(Err("unsupported language".to_string()))),
            store.clone(),
        );

        let failure = adapter.synthesize("Bonjour", &french()).await.unwrap_err();

        assert_eq!(failure.language, "fr");
        assert!(failure.cause.contains("unsupported language"));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_adapter_empty_audio_is_failure() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path());
        let adapter = SpeechAdapter::new(Arc::new(FixedTts(Ok(Vec::new()))), store.clone());

        let failure = adapter.synthesize("Bonjour", &french()).await.unwrap_err();

        assert!(failure.cause.contains("no audio"));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    // ==================== GoogleTranslateTts Tests ====================

    #[tokio::test]
    async fn test_google_tts_single_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("tl", "fr"))
            .and(query_param("q", "Bonjour le monde"))
            .and(query_param("client", "tw-ob"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .expect(1)
            .mount(&mock_server)
            .await;

        let tts = GoogleTranslateTts::with_timeout(
            &format!("{}/translate_tts", mock_server.uri()),
            Duration::from_secs(5),
        )
        .unwrap();

        let audio = tts.synthesize("Bonjour le monde", "fr").await.unwrap();
        assert_eq!(audio, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_google_tts_concatenates_chunks() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("idx", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 1]))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("idx", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![2u8, 2]))
            .expect(1)
            .mount(&mock_server)
            .await;

        let tts = GoogleTranslateTts::with_timeout(&mock_server.uri(), Duration::from_secs(5))
            .unwrap();

        let text = "mot ".repeat(30);
        let audio = tts.synthesize(&text, "fr").await.unwrap();
        assert_eq!(audio, vec![1, 1, 2, 2]);
    }

    #[tokio::test]
    async fn test_google_tts_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad language"))
            .mount(&mock_server)
            .await;

        let tts = GoogleTranslateTts::with_timeout(&mock_server.uri(), Duration::from_secs(5))
            .unwrap();

        let err = tts.synthesize("Bonjour", "xx").await.unwrap_err();
        assert!(err.to_string().contains("400"));
    }
}
