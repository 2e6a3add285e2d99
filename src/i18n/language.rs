//! Language entry: one row of the catalog.

use serde::Serialize;
use std::fmt;

/// A target language offered by the catalog.
///
/// Entries are immutable once built; the catalog decides their order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LanguageEntry {
    /// Short language identifier understood by the speech provider (e.g. "fr")
    code: String,

    /// English display name, used in the translation prompt (e.g. "French")
    display_name: String,
}

impl LanguageEntry {
    pub fn new(code: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display_name: display_name.into(),
        }
    }

    /// Get the language code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Get the human-readable name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

impl fmt::Display for LanguageEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let french = LanguageEntry::new("fr", "French");
        assert_eq!(french.code(), "fr");
        assert_eq!(french.display_name(), "French");
    }

    #[test]
    fn test_display_format() {
        let german = LanguageEntry::new("de", "German");
        assert_eq!(german.to_string(), "German (de)");
    }

    #[test]
    fn test_serializes_both_fields() {
        let json = serde_json::to_string(&LanguageEntry::new("ja", "Japanese")).unwrap();
        assert_eq!(json, r#"{"code":"ja","display_name":"Japanese"}"#);
    }
}
