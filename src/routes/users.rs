use super::{check, int_column, method_not_allowed, path_id, AppState};
use crate::auth::AuthUser;
use crate::errors::{AppError, AppResult};
use crate::extract::{JsonBody, Localized};
use crate::i18n::strings::keys;
use crate::models::{UserChanges, UserRole};
use crate::response::Reply;
use crate::validation::{raw_string, schemas, trimmed_string};
use axum::extract::{Path, State};
use axum::routing::get;
use axum::Router;
use serde_json::Value;
use std::collections::HashMap;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).fallback(method_not_allowed))
        .route("/me", get(own_profile).fallback(method_not_allowed))
        .route(
            "/:id",
            get(user_detail)
                .put(update_user)
                .fallback(method_not_allowed),
        )
}

/// Admins see full records, users only ids and nick names.
async fn list_users(
    State(state): State<AppState>,
    localized: Localized,
    user: AuthUser,
) -> AppResult<Reply> {
    match user.role {
        UserRole::Admin => {
            let users = state.db.list_users().await?;
            Ok(localized.ok(&users, keys::USER_LIST))
        }
        UserRole::User => {
            let users = state.db.list_user_summaries().await?;
            Ok(localized.ok(&users, keys::USER_LIST))
        }
    }
}

async fn own_profile(
    State(state): State<AppState>,
    localized: Localized,
    user: AuthUser,
) -> AppResult<Reply> {
    user.require_role(&[UserRole::User])?;

    let profile = state
        .db
        .find_user_profile(user.id)
        .await?
        .ok_or(AppError::NotFound(keys::USER_NOT_FOUND))?;
    Ok(localized.ok(&profile, keys::USER_PROFILE))
}

async fn user_detail(
    State(state): State<AppState>,
    localized: Localized,
    user: AuthUser,
    Path(params): Path<HashMap<String, String>>,
) -> AppResult<Reply> {
    user.require_role(&[UserRole::Admin])?;
    check(&schemas::get_user_by_id(), &Value::Null, &params, &HashMap::new())?;

    let found = state
        .db
        .find_user(path_id(&params, "id"))
        .await?
        .ok_or(AppError::NotFound(keys::USER_NOT_FOUND))?;
    Ok(localized.ok(&found, keys::USER_DETAIL))
}

async fn update_user(
    State(state): State<AppState>,
    localized: Localized,
    user: AuthUser,
    Path(params): Path<HashMap<String, String>>,
    JsonBody(body): JsonBody,
) -> AppResult<Reply> {
    user.require_role(&[UserRole::Admin])?;
    check(&schemas::update_user(), &body, &params, &HashMap::new())?;

    let changes = UserChanges {
        name: trimmed_string(&body, "name"),
        surname: trimmed_string(&body, "surname"),
        nick_name: trimmed_string(&body, "nickName"),
        age: int_column(&body, "age")?,
        role: raw_string(&body, "role")
            .as_deref()
            .and_then(UserRole::parse),
    };

    let updated = state
        .db
        .update_user(path_id(&params, "id"), &changes)
        .await?
        .ok_or(AppError::NotFound(keys::USER_NOT_FOUND))?;
    Ok(localized.ok(&updated, keys::USER_UPDATED))
}
