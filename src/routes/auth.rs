use super::{check, int_column, method_not_allowed, AppState};
use crate::auth::{hash_password, verify_password};
use crate::errors::{AppError, AppResult};
use crate::extract::{JsonBody, Localized};
use crate::i18n::strings::keys;
use crate::models::{NewUser, UserRole};
use crate::response::Reply;
use crate::validation::{raw_string, schemas, trimmed_string};
use axum::extract::State;
use axum::routing::post;
use axum::Router;
use serde_json::json;
use std::collections::HashMap;
use tracing::info;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register).fallback(method_not_allowed))
        .route("/login", post(login).fallback(method_not_allowed))
}

async fn register(
    State(state): State<AppState>,
    localized: Localized,
    JsonBody(body): JsonBody,
) -> AppResult<Reply> {
    check(&schemas::register(), &body, &HashMap::new(), &HashMap::new())?;

    let email = trimmed_string(&body, "email").unwrap_or_default();
    if state.db.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest(keys::EMAIL_ALREADY_EXISTS));
    }

    let password = raw_string(&body, "password").unwrap_or_default();
    let new_user = NewUser {
        name: trimmed_string(&body, "name").unwrap_or_default(),
        surname: trimmed_string(&body, "surname").unwrap_or_default(),
        nick_name: trimmed_string(&body, "nickName").unwrap_or_default(),
        email,
        age: int_column(&body, "age")?.unwrap_or_default(),
        role: raw_string(&body, "role")
            .as_deref()
            .and_then(UserRole::parse)
            .unwrap_or(UserRole::User),
        password_hash: hash_password(password).await?,
    };

    let user = state.db.create_user(&new_user).await?;
    info!(user_id = user.id, role = %user.role, "User registered");
    Ok(localized.created(&user, keys::REGISTERED))
}

async fn login(
    State(state): State<AppState>,
    localized: Localized,
    JsonBody(body): JsonBody,
) -> AppResult<Reply> {
    check(&schemas::login(), &body, &HashMap::new(), &HashMap::new())?;

    let email = trimmed_string(&body, "email").unwrap_or_default();
    let password = raw_string(&body, "password").unwrap_or_default();

    let Some(user) = state.db.find_user_by_email(&email).await? else {
        return Err(AppError::Unauthorized(keys::INVALID_CREDENTIALS));
    };
    if !verify_password(password, user.password_hash.clone()).await? {
        return Err(AppError::Unauthorized(keys::INVALID_CREDENTIALS));
    }

    let token = state.jwt.issue(&user)?;
    info!(user_id = user.id, "User logged in");
    Ok(localized.ok(&json!({ "token": token }), keys::LOGGED_IN))
}
