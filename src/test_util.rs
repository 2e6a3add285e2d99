//! Test doubles for the provider adapters.

use crate::artifacts::ArtifactRef;
use crate::i18n::LanguageEntry;
use crate::service::AdapterFactory;
use crate::speech::{SpeechSynthesizer, SynthesisFailure};
use crate::translation::{ClientInitError, TranslationFailure, Translator};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Translator returning canned text, failing for chosen codes, recording calls.
#[derive(Default)]
pub struct FakeTranslator {
    pub replies: HashMap<String, String>,
    pub failing: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeTranslator {
    pub fn failing_for(codes: &[&str]) -> Self {
        Self {
            failing: codes.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_reply(mut self, code: &str, reply: &str) -> Self {
        self.replies.insert(code.to_string(), reply.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(
        &self,
        text: &str,
        target: &LanguageEntry,
    ) -> Result<String, TranslationFailure> {
        self.calls.lock().unwrap().push(target.code().to_string());
        if self.failing.contains(target.code()) {
            return Err(TranslationFailure {
                language: target.code().to_string(),
                cause: "provider unavailable".to_string(),
            });
        }
        Ok(self
            .replies
            .get(target.code())
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", target.code(), text)))
    }
}

/// Synthesizer handing out fake refs, failing for chosen codes, recording calls.
#[derive(Default)]
pub struct FakeSynthesizer {
    pub failing: HashSet<String>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeSynthesizer {
    pub fn failing_for(codes: &[&str]) -> Self {
        Self {
            failing: codes.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn called_codes(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(code, _)| code.clone())
            .collect()
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        language: &LanguageEntry,
    ) -> Result<ArtifactRef, SynthesisFailure> {
        self.calls
            .lock()
            .unwrap()
            .push((language.code().to_string(), text.to_string()));
        if self.failing.contains(language.code()) {
            return Err(SynthesisFailure {
                language: language.code().to_string(),
                cause: "voice not available".to_string(),
            });
        }
        Ok(ArtifactRef::new(format!("{}.mp3", language.code())))
    }
}

/// Factory handing out shared fakes, or failing to build the translator.
pub struct FakeFactory {
    pub translator: Arc<FakeTranslator>,
    pub synthesizer: Arc<FakeSynthesizer>,
    pub broken: bool,
}

impl FakeFactory {
    pub fn new(translator: FakeTranslator, synthesizer: FakeSynthesizer) -> Self {
        Self {
            translator: Arc::new(translator),
            synthesizer: Arc::new(synthesizer),
            broken: false,
        }
    }
}

impl AdapterFactory for FakeFactory {
    fn translator(&self) -> Result<Arc<dyn Translator>, ClientInitError> {
        if self.broken {
            return Err(ClientInitError {
                client: "translation",
                cause: "TLS backend unavailable".to_string(),
            });
        }
        Ok(self.translator.clone())
    }

    fn synthesizer(&self) -> Result<Arc<dyn SpeechSynthesizer>, ClientInitError> {
        Ok(self.synthesizer.clone())
    }
}
