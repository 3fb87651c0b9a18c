//! Supported languages and request language resolution.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use serde::Serialize;
use std::fmt;

/// Name of the request header carrying the preferred language.
pub const LANGUAGE_HEADER: &str = "language";

/// A language the API can respond in.
///
/// The set is closed: resolution of arbitrary input always lands on one of
/// these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SupportedLanguage {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "sk")]
    Slovak,
}

impl SupportedLanguage {
    /// Every supported language, in registry order.
    pub const ALL: [SupportedLanguage; 2] = [SupportedLanguage::English, SupportedLanguage::Slovak];

    /// Parse a language code, ignoring ASCII case.
    ///
    /// # Returns
    /// * `Some(language)` for any registered code in any case
    /// * `None` for anything else
    pub fn from_code(code: &str) -> Option<SupportedLanguage> {
        LanguageRegistry::get()
            .get_by_code(&code.to_ascii_lowercase())
            .map(|config| config.language)
    }

    /// Resolve the language of a request from its `language` header value.
    ///
    /// Never fails: a missing, non-UTF-8 or unsupported value yields the
    /// default language.
    pub fn resolve(header_value: Option<&str>) -> SupportedLanguage {
        header_value
            .and_then(SupportedLanguage::from_code)
            .unwrap_or_default()
    }

    /// Resolve the language from a full header map.
    pub fn from_headers(headers: &axum::http::HeaderMap) -> SupportedLanguage {
        let value = headers
            .get(LANGUAGE_HEADER)
            .and_then(|value| value.to_str().ok());
        SupportedLanguage::resolve(value)
    }

    /// Get the ISO 639-1 language code.
    pub fn code(self) -> &'static str {
        self.config().code
    }

    /// Get the full language configuration from the registry.
    pub fn config(self) -> &'static LanguageConfig {
        LanguageRegistry::get().config(self)
    }

    /// Get the English name of the language.
    pub fn name(self) -> &'static str {
        self.config().name
    }

    /// Get the native name of the language.
    pub fn native_name(self) -> &'static str {
        self.config().native_name
    }

    pub(crate) fn index(self) -> usize {
        match self {
            SupportedLanguage::English => 0,
            SupportedLanguage::Slovak => 1,
        }
    }
}

/// The registry's default entry.
impl Default for SupportedLanguage {
    fn default() -> Self {
        LanguageRegistry::get().default_language().language
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};
    use proptest::prelude::*;

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_english() {
        assert_eq!(
            SupportedLanguage::from_code("en"),
            Some(SupportedLanguage::English)
        );
    }

    #[test]
    fn test_from_code_slovak() {
        assert_eq!(
            SupportedLanguage::from_code("sk"),
            Some(SupportedLanguage::Slovak)
        );
    }

    #[test]
    fn test_from_code_is_case_insensitive() {
        assert_eq!(
            SupportedLanguage::from_code("SK"),
            Some(SupportedLanguage::Slovak)
        );
        assert_eq!(
            SupportedLanguage::from_code("En"),
            Some(SupportedLanguage::English)
        );
    }

    #[test]
    fn test_from_code_covers_every_registered_code() {
        for language in SupportedLanguage::ALL {
            assert_eq!(SupportedLanguage::from_code(language.code()), Some(language));
            let upper = language.code().to_ascii_uppercase();
            assert_eq!(SupportedLanguage::from_code(&upper), Some(language));
        }
    }

    #[test]
    fn test_from_code_unknown() {
        assert_eq!(SupportedLanguage::from_code("fr"), None);
        assert_eq!(SupportedLanguage::from_code(""), None);
        assert_eq!(SupportedLanguage::from_code("en-US"), None);
    }

    // ==================== resolve Tests ====================

    #[test]
    fn test_resolve_missing_header_defaults_to_english() {
        assert_eq!(SupportedLanguage::resolve(None), SupportedLanguage::English);
    }

    #[test]
    fn test_resolve_unknown_defaults_to_english() {
        assert_eq!(
            SupportedLanguage::resolve(Some("de")),
            SupportedLanguage::English
        );
    }

    #[test]
    fn test_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(
            SupportedLanguage::from_headers(&headers),
            SupportedLanguage::English
        );

        headers.insert(LANGUAGE_HEADER, HeaderValue::from_static("Sk"));
        assert_eq!(
            SupportedLanguage::from_headers(&headers),
            SupportedLanguage::Slovak
        );
    }

    #[test]
    fn test_from_headers_non_utf8_defaults() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LANGUAGE_HEADER,
            HeaderValue::from_bytes(&[0xE9, 0x6E]).unwrap(),
        );
        assert_eq!(
            SupportedLanguage::from_headers(&headers),
            SupportedLanguage::English
        );
    }

    proptest! {
        #[test]
        fn prop_resolve_never_leaves_supported_set(value in ".*") {
            let resolved = SupportedLanguage::resolve(Some(&value));
            prop_assert!(SupportedLanguage::ALL.contains(&resolved));
        }

        #[test]
        fn prop_unsupported_values_default(value in "[a-z]{3,8}") {
            prop_assert_eq!(
                SupportedLanguage::resolve(Some(&value)),
                SupportedLanguage::English
            );
        }
    }

    // ==================== Metadata Tests ====================

    #[test]
    fn test_codes_and_names() {
        assert_eq!(SupportedLanguage::English.code(), "en");
        assert_eq!(SupportedLanguage::Slovak.code(), "sk");
        assert_eq!(SupportedLanguage::Slovak.name(), "Slovak");
        assert_eq!(SupportedLanguage::Slovak.native_name(), "Slovenčina");
    }

    #[test]
    fn test_default_is_english() {
        assert_eq!(SupportedLanguage::default(), SupportedLanguage::English);
        assert!(SupportedLanguage::default().config().is_default);
    }

    #[test]
    fn test_display_uses_code() {
        assert_eq!(SupportedLanguage::Slovak.to_string(), "sk");
    }

    #[test]
    fn test_serializes_as_code() {
        let json = serde_json::to_string(&SupportedLanguage::Slovak).unwrap();
        assert_eq!(json, "\"sk\"");
    }
}
