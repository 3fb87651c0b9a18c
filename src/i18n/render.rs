//! Placeholder substitution for message templates.
//!
//! Placeholders have the form `{name}`. Rendering is a single left-to-right
//! scan: substituted values are copied verbatim and never rescanned, and
//! placeholder names are compared literally, so names and values may contain
//! any characters.

use std::collections::BTreeMap;
use std::fmt::Display;

/// Values for template placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderParams {
    values: BTreeMap<String, String>,
}

impl RenderParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing an earlier value with the same name.
    pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Display) {
        self.values.insert(name.into(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Render `template`, replacing every `{name}` that has a value in `params`.
///
/// Placeholders without a value are left as they are.
pub fn render(template: &str, params: &RenderParams) -> String {
    if params.is_empty() {
        return template.to_string();
    }

    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        // The nearest '{' or '}' decides: a '{' first means this brace is literal
        match after_open.find(['{', '}']) {
            Some(close) if after_open.as_bytes()[close] == b'}' => {
                let name = &after_open[..close];
                match params.get(name) {
                    Some(value) => result.push_str(value),
                    None => {
                        result.push('{');
                        result.push_str(name);
                        result.push('}');
                    }
                }
                rest = &after_open[close + 1..];
            }
            _ => {
                result.push('{');
                rest = after_open;
            }
        }
    }

    result.push_str(rest);
    result
}
