//! Language catalog: the ordered list of target languages.
//!
//! The catalog is an ordinary value built once at startup and handed to the
//! service, so tests can swap in a smaller one. Its order is both the
//! processing order and the display order of results.

use super::LanguageEntry;
use anyhow::{bail, Result};
use std::collections::HashSet;

/// The 40 most widely spoken languages, in the order they are offered.
const DEFAULT_LANGUAGES: &[(&str, &str)] = &[
    ("zh", "Chinese"),
    ("es", "Spanish"),
    ("en", "English"),
    ("hi", "Hindi"),
    ("ar", "Arabic"),
    ("pt", "Portuguese"),
    ("bn", "Bengali"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("pa", "Punjabi"),
    ("de", "German"),
    ("fr", "French"),
    ("it", "Italian"),
    ("tr", "Turkish"),
    ("ko", "Korean"),
    ("vi", "Vietnamese"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("mr", "Marathi"),
    ("ur", "Urdu"),
    ("gu", "Gujarati"),
    ("th", "Thai"),
    ("kn", "Kannada"),
    ("ml", "Malayalam"),
    ("or", "Odia"),
    ("ne", "Nepali"),
    ("as", "Assamese"),
    ("id", "Indonesian"),
    ("ms", "Malay"),
    ("tl", "Tagalog"),
    ("sw", "Swahili"),
    ("am", "Amharic"),
    ("fa", "Persian"),
    ("pl", "Polish"),
    ("uk", "Ukrainian"),
    ("nl", "Dutch"),
    ("ro", "Romanian"),
    ("el", "Greek"),
    ("he", "Hebrew"),
    ("hu", "Hungarian"),
];

/// Ordered, immutable set of supported target languages.
#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    languages: Vec<LanguageEntry>,
}

impl LanguageCatalog {
    /// Build a catalog from explicit entries.
    ///
    /// Codes must be non-empty and unique; order is kept as given.
    pub fn new(languages: Vec<LanguageEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for language in &languages {
            if language.code().is_empty() || language.display_name().is_empty() {
                bail!("Catalog entry has an empty code or name: {:?}", language);
            }
            if !seen.insert(language.code().to_string()) {
                bail!("Duplicate language code in catalog: '{}'", language.code());
            }
        }
        Ok(Self { languages })
    }

    /// Number of languages offered.
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// All entries in catalog order.
    pub fn entries(&self) -> &[LanguageEntry] {
        &self.languages
    }

    /// The first `count` entries (or all of them if `count` exceeds the catalog).
    pub fn first(&self, count: usize) -> &[LanguageEntry] {
        &self.languages[..count.min(self.languages.len())]
    }

    /// Look up an entry by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageEntry> {
        self.languages.iter().find(|lang| lang.code() == code)
    }

    /// Look up an entry by its display name (case-insensitive).
    pub fn get_by_name(&self, name: &str) -> Option<&LanguageEntry> {
        self.languages
            .iter()
            .find(|lang| lang.display_name().eq_ignore_ascii_case(name))
    }
}

impl Default for LanguageCatalog {
    fn default() -> Self {
        Self {
            languages: DEFAULT_LANGUAGES
                .iter()
                .map(|(code, name)| LanguageEntry::new(*code, *name))
                .collect(),
        }
    }
}
