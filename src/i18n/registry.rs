//! Language registry: Single source of truth for all supported languages.
//!
//! The registry holds the metadata of every language the API can answer in.
//! The set is closed and fixed at build time, so the table is a plain static
//! array indexed by [`SupportedLanguage`].

use crate::i18n::SupportedLanguage;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// The language this entry describes
    pub language: SupportedLanguage,

    /// ISO 639-1 language code (e.g., "en", "sk")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Slovak")
    pub name: &'static str,

    /// Native name of the language (e.g., "English", "Slovenčina")
    pub native_name: &'static str,

    /// Whether this language is used when a request does not ask for one
    /// (exactly one entry is the default)
    pub is_default: bool,
}

/// Language registry.
///
/// Immutable for the lifetime of the process.
pub struct LanguageRegistry {
    languages: &'static [LanguageConfig],
}

/// Entries are ordered like [`SupportedLanguage::ALL`].
static LANGUAGES: [LanguageConfig; 2] = [
    LanguageConfig {
        language: SupportedLanguage::English,
        code: "en",
        name: "English",
        native_name: "English",
        is_default: true,
    },
    LanguageConfig {
        language: SupportedLanguage::Slovak,
        code: "sk",
        name: "Slovak",
        native_name: "Slovenčina",
        is_default: false,
    },
];

static REGISTRY: LanguageRegistry = LanguageRegistry {
    languages: &LANGUAGES,
};

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        &REGISTRY
    }

    /// Get the configuration of a supported language.
    pub fn config(&self, language: SupportedLanguage) -> &'static LanguageConfig {
        &self.languages[language.index()]
    }

    /// Get a language configuration by its code.
    ///
    /// The comparison is exact; callers that accept user input lowercase it
    /// first (see [`SupportedLanguage::from_code`]).
    ///
    /// # Returns
    /// * `Some(&LanguageConfig)` if the language exists
    /// * `None` if the language is not found
    pub fn get_by_code(&self, code: &str) -> Option<&'static LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get the default language configuration.
    ///
    /// Falls back to the first entry if none is flagged.
    pub fn default_language(&self) -> &'static LanguageConfig {
        let languages = self.languages;
        languages
            .iter()
            .find(|lang| lang.is_default)
            .unwrap_or(&languages[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LanguageRegistry::get();
        let registry2 = LanguageRegistry::get();

        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_code_english() {
        let config = LanguageRegistry::get().get_by_code("en").unwrap();
        assert_eq!(config.language, SupportedLanguage::English);
        assert_eq!(config.code, "en");
        assert_eq!(config.name, "English");
        assert_eq!(config.native_name, "English");
        assert!(config.is_default);
    }

    #[test]
    fn test_get_by_code_slovak() {
        let config = LanguageRegistry::get().get_by_code("sk").unwrap();
        assert_eq!(config.language, SupportedLanguage::Slovak);
        assert_eq!(config.code, "sk");
        assert_eq!(config.name, "Slovak");
        assert_eq!(config.native_name, "Slovenčina");
        assert!(!config.is_default);
    }

    #[test]
    fn test_get_by_code_is_exact() {
        let registry = LanguageRegistry::get();
        assert!(registry.get_by_code("fr").is_none());
        assert!(registry.get_by_code("SK").is_none());
        assert!(registry.get_by_code("").is_none());
    }

    #[test]
    fn test_exactly_one_default() {
        let defaults = LANGUAGES.iter().filter(|lang| lang.is_default).count();
        assert_eq!(defaults, 1);
        let default = LanguageRegistry::get().default_language();
        assert_eq!(default.code, "en");
        assert_eq!(default.language, SupportedLanguage::English);
    }

    #[test]
    fn test_config_matches_enum_order() {
        let registry = LanguageRegistry::get();
        assert_eq!(LANGUAGES.len(), SupportedLanguage::ALL.len());
        for language in SupportedLanguage::ALL {
            assert_eq!(registry.config(language).language, language);
        }
    }
}
