//! Application error type and its HTTP rendering.
//!
//! Every error becomes the standard envelope with `{}` as data and a message
//! in the request's language. Server-side failures are logged and answered
//! with a generic message; their details never reach the client.

use crate::i18n::{localize_failure, strings::keys, translate, SupportedLanguage};
use crate::middleware::current_language;
use crate::response::{Envelope, Reply};
use crate::validation::ValidationFailure;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {}", .0.message)]
    Validation(ValidationFailure),

    #[error("bad request: {0}")]
    BadRequest(&'static str),

    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<ValidationFailure> for AppError {
    fn from(failure: ValidationFailure) -> Self {
        AppError::Validation(failure)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Database(_)
            | AppError::Token(_)
            | AppError::Hashing(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message in `language`.
    pub fn localized_message(&self, language: SupportedLanguage) -> String {
        match self {
            AppError::Validation(failure) => localize_failure(failure, language),
            AppError::BadRequest(key)
            | AppError::Unauthorized(key)
            | AppError::Forbidden(key)
            | AppError::NotFound(key) => translate(language, key),
            AppError::MethodNotAllowed => translate(language, keys::METHOD_NOT_ALLOWED),
            _ => translate(language, keys::SOMETHING_WENT_WRONG),
        }
    }

    /// Render as a reply in `language`, logging server-side failures.
    pub fn into_reply(self, language: SupportedLanguage) -> Reply {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        Reply::status(status, Envelope::empty(self.localized_message(language)))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_reply(current_language()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== Status Tests ====================

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::Validation(ValidationFailure::body("x")), StatusCode::BAD_REQUEST),
            (AppError::BadRequest(keys::EMAIL_ALREADY_EXISTS), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized(keys::INVALID_CREDENTIALS), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden(keys::FORBIDDEN), StatusCode::FORBIDDEN),
            (AppError::NotFound(keys::USER_NOT_FOUND), StatusCode::NOT_FOUND),
            (AppError::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED),
            (AppError::Database(sqlx::Error::RowNotFound), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Internal(anyhow::anyhow!("boom")), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(error.status(), expected, "{error}");
        }
    }

    // ==================== Message Tests ====================

    #[test]
    fn test_validation_message_is_localized() {
        let error = AppError::from(ValidationFailure::new("age", "Age must be a non-negative integer"));
        assert_eq!(
            error.localized_message(SupportedLanguage::Slovak),
            "Vek musí byť nezáporné celé číslo"
        );
    }

    #[test]
    fn test_keyed_message_is_translated() {
        let error = AppError::NotFound(keys::EXERCISE_NOT_FOUND);
        assert_eq!(error.localized_message(SupportedLanguage::English), "Exercise not found");
        assert_eq!(
            error.localized_message(SupportedLanguage::Slovak),
            "Cvičenie nebolo nájdené"
        );
    }

    #[test]
    fn test_method_not_allowed_reply() {
        let reply = AppError::MethodNotAllowed.into_reply(SupportedLanguage::Slovak);
        assert_eq!(reply.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(reply.envelope().message, "Metóda nie je povolená");
        assert_eq!(reply.envelope().data, json!({}));
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let error = AppError::Internal(anyhow::anyhow!("connection refused on 10.0.0.3"));
        let reply = error.into_reply(SupportedLanguage::Slovak);
        assert_eq!(reply.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.envelope().message, "Niečo sa pokazilo");
        assert_eq!(reply.envelope().data, json!({}));
    }

    #[test]
    fn test_display_includes_detail() {
        let error = AppError::Validation(ValidationFailure::new("name", "Name is required"));
        assert_eq!(error.to_string(), "validation failed: Name is required");
    }
}
