//! Request validation.
//!
//! Rules are declarative: each names a field, where the field lives (JSON body,
//! path parameter or query string), whether it may be absent, and the check to
//! run. A schema is an ordered list of rules; [`first_failure`] runs them in
//! order and stops at the first one that fails.
//!
//! Failure messages are the English phrases clients already know
//! (`"Age must be a non-negative integer"`); they are localized later by
//! [`localize_failure`](crate::i18n::localize_failure).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Accepted values for `User.role`
pub const USER_ROLES: &[&str] = &["USER", "ADMIN"];

/// Accepted values for `Exercise.difficulty`
pub const EXERCISE_DIFFICULTIES: &[&str] = &["EASY", "MEDIUM", "HARD"];

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Path of the offending field; `None` for request-wide failures
    pub field: Option<String>,
    /// English phrase or `{placeholder}` template
    pub message: String,
}

impl ValidationFailure {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// A failure not tied to any field.
    pub fn body(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

/// Where a rule reads its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Body,
    Param,
    Query,
}

/// The check a rule performs.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    /// Non-empty string, optionally after trimming whitespace
    NotEmpty { trim: bool },
    /// Syntactically valid email address (after trimming)
    Email,
    /// Integer (JSON number or integer string) within bounds
    Int { min: i64, max: Option<i64> },
    /// At least `min` characters
    MinLength(usize),
    /// One of a fixed set of values
    OneOf(&'static [&'static str]),
    /// ISO 8601 date or date-time
    Iso8601,
}

/// One field rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub field: &'static str,
    pub location: Location,
    /// Skip the check when the field is absent
    pub optional: bool,
    pub check: Check,
    pub message: String,
}

impl Rule {
    fn body(field: &'static str, check: Check, message: String) -> Self {
        Self {
            field,
            location: Location::Body,
            optional: false,
            check,
            message,
        }
    }

    fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn located(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Cap an integer rule at what an `INTEGER` column holds.
    fn stored_as_i32(mut self) -> Self {
        if let Check::Int { max, .. } = &mut self.check {
            *max = Some(i64::from(i32::MAX));
        }
        self
    }

    pub fn email(field: &'static str) -> Self {
        Self::body(field, Check::Email, "Email must be a valid email".to_string())
    }

    pub fn required_string(field: &'static str, label: &str) -> Self {
        Self::body(field, Check::NotEmpty { trim: true }, format!("{label} is required"))
    }

    pub fn optional_string(field: &'static str, label: &str) -> Self {
        Self::body(field, Check::NotEmpty { trim: true }, format!("{label} cannot be empty"))
            .optional()
    }

    pub fn positive_integer(field: &'static str, label: &str) -> Self {
        Self::body(
            field,
            Check::Int { min: 1, max: None },
            format!("{label} must be a positive integer"),
        )
    }

    pub fn optional_positive_integer(field: &'static str, label: &str) -> Self {
        Self::positive_integer(field, label).optional()
    }

    pub fn non_negative_integer(field: &'static str, label: &str) -> Self {
        Self::body(
            field,
            Check::Int { min: 0, max: None },
            format!("{label} must be a non-negative integer"),
        )
    }

    pub fn password(field: &'static str, min_length: usize) -> Self {
        Self::body(
            field,
            Check::MinLength(min_length),
            format!("Password must be at least {min_length} characters long"),
        )
    }

    pub fn one_of(field: &'static str, values: &'static [&'static str], label: &str) -> Self {
        Self::body(field, Check::OneOf(values), format!("Invalid {label}"))
    }

    pub fn optional_one_of(field: &'static str, values: &'static [&'static str], label: &str) -> Self {
        Self::one_of(field, values, label).optional()
    }

    /// Optional ISO 8601 timestamp.
    pub fn iso8601(field: &'static str, label: &str) -> Self {
        Self::body(field, Check::Iso8601, format!("{label} must be a valid ISO8601 date"))
            .optional()
    }

    /// Path parameter holding a positive id.
    pub fn param_id(name: &'static str, label: &str) -> Self {
        Self::positive_integer(name, label).located(Location::Param)
    }

    pub fn query_positive_integer(name: &'static str, label: &str) -> Self {
        Self::positive_integer(name, label)
            .located(Location::Query)
            .optional()
    }

    pub fn query_optional_string(name: &'static str, label: &str) -> Self {
        Self::optional_string(name, label).located(Location::Query)
    }

    pub fn query_limit(name: &'static str, min: i64, max: i64) -> Self {
        Self::body(
            name,
            Check::Int { min, max: Some(max) },
            format!("{name} must be between {min} and {max}"),
        )
        .located(Location::Query)
        .optional()
    }

    pub fn query_page(name: &'static str) -> Self {
        Self::query_positive_integer(name, name)
    }
}

/// The parts of a request rules can look at.
#[derive(Debug, Clone, Copy)]
pub struct RequestInput<'a> {
    pub body: &'a Value,
    pub params: &'a HashMap<String, String>,
    pub query: &'a HashMap<String, String>,
}

/// A field value as seen by a check.
enum FieldValue<'a> {
    Json(&'a Value),
    Text(&'a str),
}

impl FieldValue<'_> {
    /// String form of scalar values; `None` for null, arrays and objects.
    fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(text) => Some((*text).to_string()),
            FieldValue::Json(Value::String(text)) => Some(text.clone()),
            FieldValue::Json(Value::Number(number)) => Some(
                whole_number(number).map_or_else(|| number.to_string(), |whole| whole.to_string()),
            ),
            FieldValue::Json(Value::Bool(flag)) => Some(flag.to_string()),
            FieldValue::Json(_) => None,
        }
    }
}

impl<'a> RequestInput<'a> {
    fn value(&self, rule: &Rule) -> Option<FieldValue<'a>> {
        match rule.location {
            Location::Body => self.body.get(rule.field).map(FieldValue::Json),
            Location::Param => self.params.get(rule.field).map(|v| FieldValue::Text(v)),
            Location::Query => self.query.get(rule.field).map(|v| FieldValue::Text(v)),
        }
    }
}

static EMAIL_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
static INTEGER_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn email_pattern() -> Option<&'static Regex> {
    EMAIL_PATTERN
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").ok())
        .as_ref()
}

fn integer_pattern() -> Option<&'static Regex> {
    INTEGER_PATTERN
        .get_or_init(|| Regex::new(r"^[-+]?[0-9]+$").ok())
        .as_ref()
}

/// Parse an integer the way the int check accepts it.
pub fn parse_integer(text: &str) -> Option<i64> {
    let matches = integer_pattern().is_some_and(|pattern| pattern.is_match(text));
    if !matches {
        return None;
    }
    text.strip_prefix('+').unwrap_or(text).parse().ok()
}

/// Parse an ISO 8601 date or date-time; values without an offset are UTC.
pub fn parse_iso8601(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Integer value of a JSON number, accepting integral floats such as `5.0`.
fn whole_number(number: &serde_json::Number) -> Option<i64> {
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|float| float.fract() == 0.0 && *float >= i64::MIN as f64 && *float < i64::MAX as f64)
            .map(|float| float as i64)
    })
}

/// Check whether `text` is an ISO 8601 date or date-time.
pub fn is_iso8601(text: &str) -> bool {
    parse_iso8601(text).is_some()
}

impl Check {
    /// Run the check against a value; an absent value is checked as empty.
    fn passes(&self, value: Option<&FieldValue<'_>>) -> bool {
        let text = value.and_then(FieldValue::as_text);
        match self {
            Check::NotEmpty { trim } => text.is_some_and(|text| {
                let text = if *trim { text.trim() } else { text.as_str() };
                !text.is_empty()
            }),
            Check::Email => text.is_some_and(|text| {
                email_pattern().is_some_and(|pattern| pattern.is_match(text.trim()))
            }),
            Check::Int { min, max } => text
                .as_deref()
                .and_then(parse_integer)
                .is_some_and(|number| number >= *min && max.map_or(true, |max| number <= max)),
            Check::MinLength(min) => text.is_some_and(|text| text.chars().count() >= *min),
            Check::OneOf(values) => text.is_some_and(|text| values.iter().any(|value| *value == text)),
            Check::Iso8601 => text.is_some_and(|text| is_iso8601(&text)),
        }
    }
}

/// Run `rules` in order and return the first failure, if any.
pub fn first_failure(rules: &[Rule], input: RequestInput<'_>) -> Option<ValidationFailure> {
    rules.iter().find_map(|rule| {
        let value = input.value(rule);
        if value.is_none() && rule.optional {
            return None;
        }
        if rule.check.passes(value.as_ref()) {
            None
        } else {
            Some(ValidationFailure::new(rule.field, rule.message.clone()))
        }
    })
}

/// Run `rules`, failing with the first failure.
pub fn validate(rules: &[Rule], input: RequestInput<'_>) -> Result<(), ValidationFailure> {
    match first_failure(rules, input) {
        Some(failure) => Err(failure),
        None => Ok(()),
    }
}

// ==================== Field Access ====================

/// Body string field, trimmed; `None` when absent or not a string.
pub fn trimmed_string(body: &Value, field: &str) -> Option<String> {
    body.get(field)
        .and_then(Value::as_str)
        .map(|text| text.trim().to_string())
}

/// Body string field as sent.
pub fn raw_string(body: &Value, field: &str) -> Option<String> {
    body.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Body integer field given as a JSON number or an integer string.
pub fn integer(body: &Value, field: &str) -> Option<i64> {
    match body.get(field)? {
        Value::Number(number) => whole_number(number),
        Value::String(text) => parse_integer(text),
        _ => None,
    }
}

/// Path or query integer.
pub fn text_integer(values: &HashMap<String, String>, field: &str) -> Option<i64> {
    values.get(field).and_then(|text| parse_integer(text))
}

// ==================== Schemas ====================

pub mod schemas {
    //! Rule lists per endpoint.

    use super::{Rule, EXERCISE_DIFFICULTIES, USER_ROLES};

    pub fn register() -> Vec<Rule> {
        vec![
            Rule::required_string("name", "Name"),
            Rule::required_string("surname", "Surname"),
            Rule::required_string("nickName", "NickName"),
            Rule::email("email"),
            Rule::non_negative_integer("age", "Age").stored_as_i32(),
            Rule::one_of("role", USER_ROLES, "role"),
            Rule::password("password", 6),
        ]
    }

    pub fn login() -> Vec<Rule> {
        let mut password = Rule::required_string("password", "Password");
        password.check = super::Check::NotEmpty { trim: false };
        vec![Rule::email("email"), password]
    }

    pub fn create_exercise() -> Vec<Rule> {
        vec![
            Rule::required_string("name", "Name"),
            Rule::one_of("difficulty", EXERCISE_DIFFICULTIES, "difficulty"),
            Rule::optional_positive_integer("programID", "programID"),
        ]
    }

    pub fn update_exercise() -> Vec<Rule> {
        vec![
            Rule::param_id("id", "Exercise id"),
            Rule::optional_string("name", "Name"),
            Rule::optional_one_of("difficulty", EXERCISE_DIFFICULTIES, "difficulty"),
            Rule::optional_positive_integer("programID", "programID"),
        ]
    }

    pub fn delete_exercise() -> Vec<Rule> {
        vec![Rule::param_id("id", "Exercise id")]
    }

    pub fn exercises_query() -> Vec<Rule> {
        vec![
            Rule::query_page("page"),
            Rule::query_limit("limit", 1, 100),
            Rule::query_positive_integer("programID", "programID"),
            Rule::query_optional_string("search", "Search"),
        ]
    }

    pub fn get_user_by_id() -> Vec<Rule> {
        vec![Rule::param_id("id", "User id")]
    }

    pub fn update_user() -> Vec<Rule> {
        vec![
            Rule::param_id("id", "User id"),
            Rule::optional_string("name", "Name"),
            Rule::optional_string("surname", "Surname"),
            Rule::optional_string("nickName", "NickName"),
            Rule::non_negative_integer("age", "Age")
                .stored_as_i32()
                .optional(),
            Rule::optional_one_of("role", USER_ROLES, "role"),
        ]
    }

    /// Adding an exercise to a program and removing it share one schema.
    pub fn program_exercise() -> Vec<Rule> {
        vec![
            Rule::param_id("programId", "Program id"),
            Rule::param_id("exerciseId", "Exercise id"),
        ]
    }

    pub fn track_user_exercise() -> Vec<Rule> {
        vec![
            Rule::positive_integer("exerciseId", "exerciseId"),
            Rule::positive_integer("durationSeconds", "durationSeconds").stored_as_i32(),
            Rule::iso8601("completedAt", "completedAt"),
        ]
    }

    pub fn delete_user_exercise() -> Vec<Rule> {
        vec![Rule::param_id("id", "User exercise id")]
    }
}
