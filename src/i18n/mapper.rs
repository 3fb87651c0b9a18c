//! Validation outcome mapping.
//!
//! Turns the first [`ValidationFailure`] of a request into a message in the
//! request's language. Rules emit either a canonical template
//! (`"{fieldName} is required"`) or an English phrase
//! (`"Age must be a non-negative integer"`); phrases are recognized by their
//! suffix and rewritten into the matching template, with numeric bounds
//! lifted out of the phrase.

use crate::i18n::render::{render, RenderParams};
use crate::i18n::strings::templates;
use crate::i18n::{SupportedLanguage, TranslationCatalog};
use crate::validation::ValidationFailure;
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Placeholders that mark a message as a template rather than a phrase.
const TEMPLATE_MARKERS: [&str; 3] = ["{fieldName}", "{min}", "{max}"];

/// A known phrase shape and the template it maps to.
struct PhraseRule {
    pattern: Regex,
    template: &'static str,
    /// Parameter names for the pattern's capture groups, in order
    bounds: &'static [&'static str],
}

static PHRASE_RULES: OnceLock<Vec<PhraseRule>> = OnceLock::new();

fn phrase_rules() -> &'static [PhraseRule] {
    PHRASE_RULES.get_or_init(|| {
        [
            (r"^.+ is required$", templates::REQUIRED, &[][..]),
            (r"^.+ cannot be empty$", templates::NOT_EMPTY, &[]),
            (r"^.+ must be a positive integer$", templates::POSITIVE_INTEGER, &[]),
            (r"^.+ must be a non-negative integer$", templates::NON_NEGATIVE_INTEGER, &[]),
            (r"^.+ must be a valid email$", templates::VALID_EMAIL, &[]),
            (r"^.+ must be at least (-?\d+) characters long$", templates::MIN_LENGTH, &["min"]),
            (r"^.+ must be between (-?\d+) and (-?\d+)$", templates::BETWEEN, &["min", "max"]),
            (r"^.+ must be a valid ISO8601 date$", templates::ISO8601_DATE, &[]),
            (r"^Invalid .+$", templates::INVALID, &[]),
        ]
        .into_iter()
        .filter_map(|(pattern, template, bounds)| {
            // Patterns are literals covered by tests; a bad one is skipped, not fatal
            Regex::new(pattern).ok().map(|pattern| PhraseRule {
                pattern,
                template,
                bounds,
            })
        })
        .collect()
    })
}

/// How a failure message should be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageShape<'a> {
    /// The message already is a template
    Template(&'a str),
    /// A recognized phrase, rewritten to its canonical template
    Canonical {
        template: &'static str,
        bounds: RenderParams,
    },
    /// Anything else; translated as a flat key
    Flat(&'a str),
}

/// Classify a failure message.
pub fn classify_message(message: &str) -> MessageShape<'_> {
    if TEMPLATE_MARKERS.iter().any(|marker| message.contains(marker)) {
        return MessageShape::Template(message);
    }

    for rule in phrase_rules() {
        if let Some(captures) = rule.pattern.captures(message) {
            let mut bounds = RenderParams::new();
            for (name, capture) in rule.bounds.iter().zip(captures.iter().skip(1)) {
                if let Some(value) = capture {
                    bounds.insert(*name, value.as_str());
                }
            }
            return MessageShape::Canonical {
                template: rule.template,
                bounds,
            };
        }
    }

    MessageShape::Flat(message)
}

/// Uppercase the first character of `field`.
fn capitalize(field: &str) -> Cow<'_, str> {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) if !first.is_uppercase() => {
            Cow::Owned(first.to_uppercase().chain(chars).collect())
        }
        _ => Cow::Borrowed(field),
    }
}

/// Resolve the human-readable name of a field in `language`.
///
/// Tries the raw field name, then its capitalized form, as catalog keys; a
/// lookup only counts when it yields something other than the key. Falls back
/// to the capitalized field name.
pub fn field_display_name(field: &str, language: SupportedLanguage) -> String {
    let catalog = TranslationCatalog::get();

    let translated = catalog.lookup(language, field);
    if translated != field {
        return translated.to_string();
    }

    let capitalized = capitalize(field);
    let translated = catalog.lookup(language, &capitalized);
    if translated != capitalized {
        return translated.to_string();
    }

    capitalized.into_owned()
}

/// Produce the localized message for a validation failure.
pub fn localize_failure(failure: &ValidationFailure, language: SupportedLanguage) -> String {
    let catalog = TranslationCatalog::get();

    let Some(field) = failure.field.as_deref().filter(|field| !field.is_empty()) else {
        return catalog.lookup(language, &failure.message).to_string();
    };

    match classify_message(&failure.message) {
        MessageShape::Template(template) => {
            let params = RenderParams::new().with("fieldName", field_display_name(field, language));
            render(catalog.lookup(language, template), &params)
        }
        MessageShape::Canonical { template, mut bounds } => {
            bounds.insert("fieldName", field_display_name(field, language));
            render(catalog.lookup(language, template), &bounds)
        }
        MessageShape::Flat(message) => catalog.lookup(language, message).to_string(),
    }
}
