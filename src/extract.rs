//! Request extractors shared by the route handlers.

use crate::errors::AppError;
use crate::i18n::{strings::keys, SupportedLanguage};
use crate::response::{build, Reply};
use crate::sanitize::PlainData;
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use serde_json::{Map, Value};
use std::convert::Infallible;

/// The language resolved for the current request.
///
/// Reads what the language middleware stored; resolves from the headers when
/// the middleware did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Localized(pub SupportedLanguage);

impl Localized {
    pub fn language(self) -> SupportedLanguage {
        self.0
    }

    /// 200 reply with `data` and the translated `key`.
    pub fn ok<T: PlainData + ?Sized>(self, data: &T, key: &str) -> Reply {
        Reply::ok(build(Some(self.0), data, key))
    }

    /// 201 reply with `data` and the translated `key`.
    pub fn created<T: PlainData + ?Sized>(self, data: &T, key: &str) -> Reply {
        Reply::created(build(Some(self.0), data, key))
    }

    /// 200 reply with `{}` as data.
    pub fn message(self, key: &str) -> Reply {
        self.ok(&Value::Object(Map::new()), key)
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Localized {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let language = parts
            .extensions
            .get::<SupportedLanguage>()
            .copied()
            .unwrap_or_else(|| SupportedLanguage::from_headers(&parts.headers));
        Ok(Localized(language))
    }
}

/// JSON request body as an untyped value.
///
/// An empty body reads as `{}` so field rules report missing fields rather
/// than a parse error.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for JsonBody {
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(request, state)
            .await
            .map_err(|_| AppError::BadRequest(keys::INVALID_REQUEST_BODY))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(Value::Object(Map::new())));
        }

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|_| AppError::BadRequest(keys::INVALID_REQUEST_BODY))
    }
}
