//! The `{data, message}` response envelope.

use crate::i18n::{translate, SupportedLanguage};
use crate::sanitize::PlainData;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Body shape shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub data: Value,
    pub message: String,
}

impl Envelope {
    /// Envelope with an already localized message.
    pub fn new(data: Value, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
        }
    }

    /// Envelope with `{}` as data.
    pub fn empty(message: impl Into<String>) -> Self {
        Self::new(Value::Object(Map::new()), message)
    }
}

/// Build an envelope for `data` with `key` translated into `language`.
///
/// An unset language falls back to the default. Data that cannot be turned
/// into JSON is replaced by `{}` so the response still goes out.
pub fn build<T: PlainData + ?Sized>(
    language: Option<SupportedLanguage>,
    data: &T,
    key: &str,
) -> Envelope {
    let language = language.unwrap_or_default();
    let data = data.to_plain().unwrap_or_else(|e| {
        warn!("Failed to convert response data, sending empty object: {}", e);
        Value::Object(Map::new())
    });
    Envelope::new(data, translate(language, key))
}

/// An envelope paired with its HTTP status.
#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    envelope: Envelope,
}

impl Reply {
    pub fn ok(envelope: Envelope) -> Self {
        Self::status(StatusCode::OK, envelope)
    }

    pub fn created(envelope: Envelope) -> Self {
        Self::status(StatusCode::CREATED, envelope)
    }

    pub fn status(status: StatusCode, envelope: Envelope) -> Self {
        Self { status, envelope }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}
