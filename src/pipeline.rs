//! Per-submission driver: translate then synthesize, one language at a time.
//!
//! Every attempted language ends up in exactly one of `results` or
//! `failures`. A failure for one language never stops the others.

use crate::artifacts::ArtifactRef;
use crate::i18n::LanguageEntry;
use crate::speech::SpeechSynthesizer;
use crate::translation::Translator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// One language rendered successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationResult {
    pub language_code: String,
    pub language_name: String,
    pub translated_text: String,
    pub audio_artifact_ref: ArtifactRef,
}

/// One language that could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageFailure {
    pub language_code: String,
    pub language_name: String,
    pub error_message: String,
}

impl LanguageFailure {
    pub fn new(language: &LanguageEntry, cause: impl fmt::Display) -> Self {
        Self {
            language_code: language.code().to_string(),
            language_name: language.display_name().to_string(),
            error_message: format!("Error processing {}: {}", language, cause),
        }
    }
}

/// Aggregate result of one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestOutcome {
    /// Successes, in catalog order
    pub results: Vec<TranslationResult>,
    pub failures: Vec<LanguageFailure>,
}

impl RequestOutcome {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Outcome where every language failed for the same reason.
    pub fn all_failed(languages: &[LanguageEntry], cause: impl fmt::Display) -> Self {
        let cause = cause.to_string();
        Self {
            results: Vec::new(),
            failures: languages
                .iter()
                .map(|language| LanguageFailure::new(language, &cause))
                .collect(),
        }
    }

    /// Number of languages that produced an outcome.
    pub fn attempted(&self) -> usize {
        self.results.len() + self.failures.len()
    }
}

/// Coarse progress: how many languages are done out of how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress<'a> {
    pub completed: usize,
    pub total: usize,
    pub language_code: &'a str,
}

impl Progress<'_> {
    /// Completion ratio in `0.0..=1.0`.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }
}

pub struct Pipeline {
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl Pipeline {
    pub fn new(translator: Arc<dyn Translator>, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            translator,
            synthesizer,
        }
    }

    pub async fn run(&self, sentence: &str, languages: &[LanguageEntry]) -> RequestOutcome {
        self.run_with_progress(sentence, languages, |_| {}).await
    }

    /// Run every language in order, calling `on_progress` after each one.
    pub async fn run_with_progress<F>(
        &self,
        sentence: &str,
        languages: &[LanguageEntry],
        mut on_progress: F,
    ) -> RequestOutcome
    where
        F: FnMut(Progress<'_>) + Send,
    {
        let mut outcome = RequestOutcome::empty();

        for (i, language) in languages.iter().enumerate() {
            match self.process_language(sentence, language).await {
                Ok(result) => outcome.results.push(result),
                Err(failure) => {
                    warn!(
                        language = language.code(),
                        error = %failure.error_message,
                        "Language failed"
                    );
                    outcome.failures.push(failure);
                }
            }

            on_progress(Progress {
                completed: i + 1,
                total: languages.len(),
                language_code: language.code(),
            });
        }

        info!(
            attempted = languages.len(),
            succeeded = outcome.results.len(),
            failed = outcome.failures.len(),
            "Submission processed"
        );

        outcome
    }

    async fn process_language(
        &self,
        sentence: &str,
        language: &LanguageEntry,
    ) -> Result<TranslationResult, LanguageFailure> {
        let translated = self
            .translator
            .translate(sentence, language)
            .await
            .map_err(|e| LanguageFailure::new(language, e))?;

        let artifact = self
            .synthesizer
            .synthesize(&translated, language)
            .await
            .map_err(|e| LanguageFailure::new(language, e))?;

        Ok(TranslationResult {
            language_code: language.code().to_string(),
            language_name: language.display_name().to_string(),
            translated_text: translated,
            audio_artifact_ref: artifact,
        })
    }
}
