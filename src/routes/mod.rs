//! HTTP routes.
//!
//! - `/auth` - registration and login
//! - `/users` - user listing, profiles and admin edits
//! - `/programs` - programs and their exercises
//! - `/exercises` - exercise catalog
//! - `/user-exercises` - exercises a user has completed
//!
//! Every response goes out as a `{data, message}` envelope with the message in
//! the language named by the `language` header.

mod auth;
mod exercises;
mod programs;
mod user_exercises;
mod users;

use crate::auth::JwtKeys;
use crate::config::Config;
use crate::db::Database;
use crate::errors::{AppError, AppResult};
use crate::i18n::strings::keys;
use crate::middleware::language_layer;
use crate::sanitize::sanitize_response;
use crate::validation::{self, RequestInput, Rule};
use anyhow::Context;
use axum::extract::Request;
use axum::{middleware, Router};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info_span, Span};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtKeys>,
}

impl AppState {
    pub fn new(db: Database, config: &Config) -> Self {
        Self {
            db,
            jwt: Arc::new(JwtKeys::new(&config.jwt_secret, config.jwt_expires_in)),
        }
    }
}

/// Build the application router.
///
/// Layers run outermost first: request tracing, language resolution, then
/// response sanitizing around the handlers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/auth", auth::routes())
        .nest("/users", users::routes())
        .nest("/programs", programs::routes())
        .nest("/exercises", exercises::routes())
        .nest("/user-exercises", user_exercises::routes())
        .fallback(route_not_found)
        .layer(middleware::from_fn(sanitize_response))
        .layer(middleware::from_fn(language_layer))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
}

/// Span wrapping each request; errors logged inside it carry the method and URI.
fn request_span(request: &Request) -> Span {
    info_span!("request", method = %request.method(), uri = %request.uri())
}

async fn route_not_found() -> AppError {
    AppError::NotFound(keys::ROUTE_NOT_FOUND)
}

/// Fallback for a known path hit with a method it doesn't serve.
async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Run `rules` against the request parts a handler extracted.
fn check(
    rules: &[Rule],
    body: &Value,
    params: &HashMap<String, String>,
    query: &HashMap<String, String>,
) -> AppResult<()> {
    validation::validate(
        rules,
        RequestInput {
            body,
            params,
            query,
        },
    )?;
    Ok(())
}

/// A path id that already passed its rule.
fn path_id(params: &HashMap<String, String>, name: &str) -> i64 {
    validation::text_integer(params, name).unwrap_or_default()
}

/// A body integer stored in an `INTEGER` column, read after its rule passed.
fn int_column(body: &Value, field: &str) -> AppResult<Option<i32>> {
    let Some(value) = validation::integer(body, field) else {
        return Ok(None);
    };
    let value = i32::try_from(value).with_context(|| format!("{field} out of range: {value}"))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== Field Tests ====================

    #[test]
    fn test_int_column_reads_integers() {
        let body = json!({"age": 41, "durationSeconds": "90"});
        assert_eq!(int_column(&body, "age").ok(), Some(Some(41)));
        assert_eq!(int_column(&body, "durationSeconds").ok(), Some(Some(90)));
        assert_eq!(int_column(&body, "missing").ok(), Some(None));
    }

    #[test]
    fn test_int_column_never_narrows_to_zero() {
        let body = json!({"durationSeconds": 3_000_000_000_i64});
        let error = int_column(&body, "durationSeconds").unwrap_err();
        assert!(matches!(error, AppError::Internal(_)));
    }
}
