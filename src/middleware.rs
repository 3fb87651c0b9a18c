//! Request-scoped language handling.
//!
//! [`language_layer`] resolves the `language` header once per request, stores
//! the result in the request extensions and keeps it available to code that
//! has no access to the request (error rendering) for the rest of the
//! request's task.

use crate::i18n::SupportedLanguage;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::future::Future;
use tracing::debug;

tokio::task_local! {
    static REQUEST_LANGUAGE: SupportedLanguage;
}

/// Language of the request being handled on this task, or the default.
pub fn current_language() -> SupportedLanguage {
    REQUEST_LANGUAGE.try_with(|language| *language).unwrap_or_default()
}

/// Run `future` with `language` as the current request language.
pub async fn with_language<F: Future>(language: SupportedLanguage, future: F) -> F::Output {
    REQUEST_LANGUAGE.scope(language, future).await
}

/// Middleware resolving the request language before any handler runs.
pub async fn language_layer(mut request: Request, next: Next) -> Response {
    let language = SupportedLanguage::from_headers(request.headers());
    debug!(language = %language, "Resolved request language");
    request.extensions_mut().insert(language);
    with_language(language, next.run(request)).await
}
