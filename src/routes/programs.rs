use super::{check, method_not_allowed, path_id, AppState};
use crate::auth::AuthUser;
use crate::errors::{AppError, AppResult};
use crate::extract::Localized;
use crate::i18n::strings::keys;
use crate::models::UserRole;
use crate::response::Reply;
use crate::validation::schemas;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_programs).fallback(method_not_allowed))
        .route(
            "/:programId/exercises/:exerciseId",
            post(add_exercise)
                .delete(remove_exercise)
                .fallback(method_not_allowed),
        )
}

async fn list_programs(State(state): State<AppState>, localized: Localized) -> AppResult<Reply> {
    let programs = state.db.list_programs().await?;
    Ok(localized.ok(&programs, keys::PROGRAM_LIST))
}

async fn add_exercise(
    State(state): State<AppState>,
    localized: Localized,
    user: AuthUser,
    Path(params): Path<HashMap<String, String>>,
) -> AppResult<Reply> {
    user.require_role(&[UserRole::Admin])?;
    check(&schemas::program_exercise(), &Value::Null, &params, &HashMap::new())?;

    let program_id = path_id(&params, "programId");
    let exercise_id = path_id(&params, "exerciseId");

    if state.db.find_program(program_id).await?.is_none() {
        return Err(AppError::NotFound(keys::PROGRAM_NOT_FOUND));
    }
    let exercise = state
        .db
        .set_exercise_program(exercise_id, Some(program_id))
        .await?
        .ok_or(AppError::NotFound(keys::EXERCISE_NOT_FOUND))?;

    info!(program_id, exercise_id, "Exercise added to program");
    Ok(localized.ok(&exercise, keys::EXERCISE_ADDED_TO_PROGRAM))
}

async fn remove_exercise(
    State(state): State<AppState>,
    localized: Localized,
    user: AuthUser,
    Path(params): Path<HashMap<String, String>>,
) -> AppResult<Reply> {
    user.require_role(&[UserRole::Admin])?;
    check(&schemas::program_exercise(), &Value::Null, &params, &HashMap::new())?;

    let program_id = path_id(&params, "programId");
    let exercise_id = path_id(&params, "exerciseId");

    let in_program = state
        .db
        .find_exercise(exercise_id)
        .await?
        .is_some_and(|exercise| exercise.program_id == Some(program_id));
    if !in_program {
        return Err(AppError::NotFound(keys::EXERCISE_NOT_IN_PROGRAM));
    }

    let exercise = state
        .db
        .set_exercise_program(exercise_id, None)
        .await?
        .ok_or(AppError::NotFound(keys::EXERCISE_NOT_IN_PROGRAM))?;

    info!(program_id, exercise_id, "Exercise removed from program");
    Ok(localized.ok(&exercise, keys::EXERCISE_REMOVED_FROM_PROGRAM))
}
