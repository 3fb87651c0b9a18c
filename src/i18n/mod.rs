//! Internationalization (i18n) for request-scoped localized responses.
//!
//! All language metadata, message tables and message rendering live here.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the supported languages and their metadata
//! - `language`: Type-safe `SupportedLanguage` and header resolution
//! - `strings`: Message keys, templates and the per-language tables
//! - `catalog`: Key lookup with raw-key fallback
//! - `render`: `{placeholder}` substitution
//! - `mapper`: Validation failure → localized message
//! - `metrics`: Catalog hit/miss counters
//!
//! # Example
//!
//! ```rust,ignore
//! use fitness_tracker::i18n::{translate, SupportedLanguage};
//!
//! let language = SupportedLanguage::resolve(Some("SK"));
//! assert_eq!(translate(language, "Forbidden"), "Prístup zamietnutý");
//! ```

mod catalog;
mod language;
mod mapper;
mod metrics;
mod registry;
mod render;
pub mod strings;

pub use catalog::{translate, TranslationCatalog};
pub use language::{SupportedLanguage, LANGUAGE_HEADER};
pub use mapper::{classify_message, field_display_name, localize_failure, MessageShape};
pub use metrics::{CatalogMetrics, MetricsReport};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use render::{render, RenderParams};
