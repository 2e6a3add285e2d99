//! Submission entry point shared by the web server and the CLI.
//!
//! Validates the request, picks the languages from the catalog, builds the
//! provider clients and hands everything to the pipeline.

use crate::artifacts::{ArtifactError, ArtifactRef, ArtifactStore};
use crate::config::Config;
use crate::i18n::{LanguageCatalog, LanguageEntry};
use crate::pipeline::{Pipeline, Progress, RequestOutcome};
use crate::speech::{GoogleTranslateTts, SpeechAdapter, SpeechSynthesizer};
use crate::translation::{ChatTranslator, ClientInitError, Translator};
use std::sync::Arc;
use tracing::{error, info};

/// A submission rejected before any provider call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("Please enter a sentence to translate")]
    EmptySentence,

    #[error("No translation API key is configured")]
    MissingCredential,

    #[error("Number of languages must be between {min} and {max}, got {requested}")]
    LanguageCountOutOfRange {
        requested: usize,
        min: usize,
        max: usize,
    },
}

/// Builds the provider-backed adapters for one submission.
pub trait AdapterFactory: Send + Sync {
    fn translator(&self) -> Result<Arc<dyn Translator>, ClientInitError>;
    fn synthesizer(&self) -> Result<Arc<dyn SpeechSynthesizer>, ClientInitError>;
}

/// Factory for the real HTTP clients.
pub struct HttpAdapterFactory {
    config: Arc<Config>,
    store: ArtifactStore,
}

impl HttpAdapterFactory {
    pub fn new(config: Arc<Config>, store: ArtifactStore) -> Self {
        Self { config, store }
    }
}

impl AdapterFactory for HttpAdapterFactory {
    fn translator(&self) -> Result<Arc<dyn Translator>, ClientInitError> {
        Ok(Arc::new(ChatTranslator::new(&self.config)?))
    }

    fn synthesizer(&self) -> Result<Arc<dyn SpeechSynthesizer>, ClientInitError> {
        let provider = GoogleTranslateTts::new(&self.config)?;
        Ok(Arc::new(SpeechAdapter::new(
            Arc::new(provider),
            self.store.clone(),
        )))
    }
}

/// Bounds on how many languages one submission may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageLimits {
    pub min: usize,
    pub max: usize,
    pub default: usize,
}

impl LanguageLimits {
    /// Limits from config, with the maximum capped at the catalog size.
    pub fn from_config(config: &Config, catalog: &LanguageCatalog) -> Self {
        let max = config.max_languages.min(catalog.len());
        Self {
            min: config.min_languages.min(max),
            max,
            default: config.default_languages.min(max),
        }
    }
}

pub struct TranslationService {
    catalog: Arc<LanguageCatalog>,
    factory: Arc<dyn AdapterFactory>,
    store: ArtifactStore,
    limits: LanguageLimits,
    credential_configured: bool,
}

impl TranslationService {
    pub fn new(
        config: &Config,
        catalog: Arc<LanguageCatalog>,
        factory: Arc<dyn AdapterFactory>,
        store: ArtifactStore,
    ) -> Self {
        let limits = LanguageLimits::from_config(config, &catalog);
        Self {
            catalog,
            factory,
            store,
            limits,
            credential_configured: !config.api_key.trim().is_empty(),
        }
    }

    /// Service wired to the real providers.
    pub fn from_config(config: Arc<Config>, catalog: Arc<LanguageCatalog>) -> Self {
        let store = ArtifactStore::new(config.output_dir.clone());
        let factory = Arc::new(HttpAdapterFactory::new(config.clone(), store.clone()));
        Self::new(&config, catalog, factory, store)
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    pub fn limits(&self) -> LanguageLimits {
        self.limits
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub async fn submit(
        &self,
        sentence: &str,
        language_count: usize,
    ) -> Result<RequestOutcome, SubmitError> {
        self.submit_with_progress(sentence, language_count, |_| {})
            .await
    }

    /// Validate and run one submission.
    ///
    /// A count below the minimum yields an empty outcome without touching the
    /// providers; a count above the maximum is rejected.
    pub async fn submit_with_progress<F>(
        &self,
        sentence: &str,
        language_count: usize,
        on_progress: F,
    ) -> Result<RequestOutcome, SubmitError>
    where
        F: FnMut(Progress<'_>) + Send,
    {
        let languages = self.select_languages(sentence, language_count)?;
        if languages.is_empty() {
            info!(language_count, "Language count below minimum, nothing to do");
            return Ok(RequestOutcome::empty());
        }

        info!(
            languages = languages.len(),
            sentence_length = sentence.len(),
            "Starting translation submission"
        );

        let pipeline = match self.build_pipeline() {
            Ok(pipeline) => pipeline,
            Err(e) => {
                error!("Provider client unavailable: {}", e);
                return Ok(RequestOutcome::all_failed(languages, e));
            }
        };

        Ok(pipeline
            .run_with_progress(sentence.trim(), languages, on_progress)
            .await)
    }

    /// Read a generated clip for playback or download.
    pub async fn get_artifact(&self, artifact: &ArtifactRef) -> Result<Vec<u8>, ArtifactError> {
        self.store.read(artifact).await
    }

    fn select_languages(
        &self,
        sentence: &str,
        language_count: usize,
    ) -> Result<&[LanguageEntry], SubmitError> {
        if sentence.trim().is_empty() {
            return Err(SubmitError::EmptySentence);
        }
        if !self.credential_configured {
            return Err(SubmitError::MissingCredential);
        }
        if language_count > self.limits.max {
            return Err(SubmitError::LanguageCountOutOfRange {
                requested: language_count,
                min: self.limits.min,
                max: self.limits.max,
            });
        }
        if language_count < self.limits.min {
            return Ok(&[]);
        }
        Ok(self.catalog.first(language_count))
    }

    fn build_pipeline(&self) -> Result<Pipeline, ClientInitError> {
        Ok(Pipeline::new(
            self.factory.translator()?,
            self.factory.synthesizer()?,
        ))
    }
}
