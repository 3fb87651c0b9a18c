//! Translation catalog: message key lookup per language.
//!
//! The catalog is built once from the static tables in [`strings`](super::strings)
//! and is read-only afterwards.

use crate::i18n::render::{render, RenderParams};
use crate::i18n::strings::{ENGLISH, SLOVAK};
use crate::i18n::{CatalogMetrics, SupportedLanguage};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

/// Key → template tables for every supported language.
pub struct TranslationCatalog {
    tables: [HashMap<&'static str, &'static str>; 2],
}

static CATALOG: OnceLock<TranslationCatalog> = OnceLock::new();

impl TranslationCatalog {
    /// Get the global catalog instance.
    pub fn get() -> &'static TranslationCatalog {
        CATALOG.get_or_init(|| TranslationCatalog {
            tables: [build_table(ENGLISH), build_table(SLOVAK)],
        })
    }

    /// Look up the template for `key` in `language`.
    ///
    /// Returns `key` itself when the language has no entry for it.
    pub fn lookup<'a>(&self, language: SupportedLanguage, key: &'a str) -> &'a str {
        match self.tables[language.index()].get(key) {
            Some(&template) => {
                CatalogMetrics::global().record_hit();
                template
            }
            None => {
                CatalogMetrics::global().record_miss();
                debug!(language = %language, key, "No translation found, using key");
                key
            }
        }
    }

    /// Check whether `language` has an entry for `key`.
    pub fn contains(&self, language: SupportedLanguage, key: &str) -> bool {
        self.tables[language.index()].contains_key(key)
    }

    /// Look up `key` and render it with `params`.
    pub fn translate(&self, language: SupportedLanguage, key: &str, params: &RenderParams) -> String {
        render(self.lookup(language, key), params)
    }
}

fn build_table(entries: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
    entries.iter().copied().collect()
}

/// Translate `key` into `language` without parameters.
pub fn translate(language: SupportedLanguage, key: &str) -> String {
    TranslationCatalog::get().lookup(language, key).to_string()
}
