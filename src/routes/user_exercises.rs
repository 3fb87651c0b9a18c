use super::{check, int_column, method_not_allowed, path_id, AppState};
use crate::auth::AuthUser;
use crate::errors::{AppError, AppResult};
use crate::extract::{JsonBody, Localized};
use crate::i18n::strings::keys;
use crate::models::UserRole;
use crate::response::Reply;
use crate::validation::{integer, parse_iso8601, raw_string, schemas};
use axum::extract::{Path, State};
use axum::routing::{delete, get};
use axum::Router;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_completed)
                .post(track_completed)
                .fallback(method_not_allowed),
        )
        .route("/:id", delete(delete_completed).fallback(method_not_allowed))
}

async fn list_completed(
    State(state): State<AppState>,
    localized: Localized,
    user: AuthUser,
) -> AppResult<Reply> {
    user.require_role(&[UserRole::User])?;

    let completed = state.db.list_user_exercises(user.id).await?;
    Ok(localized.ok(&completed, keys::COMPLETED_EXERCISE_LIST))
}

async fn track_completed(
    State(state): State<AppState>,
    localized: Localized,
    user: AuthUser,
    JsonBody(body): JsonBody,
) -> AppResult<Reply> {
    user.require_role(&[UserRole::User])?;
    check(&schemas::track_user_exercise(), &body, &HashMap::new(), &HashMap::new())?;

    let exercise_id = integer(&body, "exerciseId").unwrap_or_default();
    let duration_seconds = int_column(&body, "durationSeconds")?.unwrap_or_default();
    let completed_at = raw_string(&body, "completedAt")
        .as_deref()
        .and_then(parse_iso8601)
        .unwrap_or_else(Utc::now);

    if state.db.find_exercise(exercise_id).await?.is_none() {
        return Err(AppError::NotFound(keys::EXERCISE_NOT_FOUND));
    }

    let tracked = state
        .db
        .create_user_exercise(user.id, exercise_id, duration_seconds, completed_at)
        .await?;
    info!(user_id = user.id, exercise_id, "Exercise tracked as completed");
    Ok(localized.created(&tracked, keys::EXERCISE_TRACKED))
}

async fn delete_completed(
    State(state): State<AppState>,
    localized: Localized,
    user: AuthUser,
    Path(params): Path<HashMap<String, String>>,
) -> AppResult<Reply> {
    user.require_role(&[UserRole::User])?;
    check(&schemas::delete_user_exercise(), &Value::Null, &params, &HashMap::new())?;

    let id = path_id(&params, "id");
    let tracked = state
        .db
        .find_user_exercise(id)
        .await?
        .ok_or(AppError::NotFound(keys::USER_EXERCISE_NOT_FOUND))?;
    if tracked.user_id != user.id {
        return Err(AppError::Forbidden(keys::USER_EXERCISE_NOT_OWNED));
    }

    if !state.db.delete_user_exercise(id).await? {
        return Err(AppError::NotFound(keys::USER_EXERCISE_NOT_FOUND));
    }
    Ok(localized.message(keys::USER_EXERCISE_DELETED))
}
