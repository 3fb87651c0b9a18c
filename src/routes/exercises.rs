use super::{check, method_not_allowed, path_id, AppState};
use crate::auth::AuthUser;
use crate::errors::{AppError, AppResult};
use crate::extract::{JsonBody, Localized};
use crate::i18n::strings::keys;
use crate::models::{Difficulty, ExerciseChanges, ExerciseFilter, UserRole};
use crate::response::Reply;
use crate::validation::{integer, raw_string, schemas, text_integer, trimmed_string};
use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::Router;
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_exercises)
                .post(create_exercise)
                .fallback(method_not_allowed),
        )
        .route(
            "/:id",
            put(update_exercise)
                .delete(delete_exercise)
                .fallback(method_not_allowed),
        )
}

fn filter_from_query(query: &HashMap<String, String>) -> ExerciseFilter {
    ExerciseFilter {
        program_id: text_integer(query, "programID"),
        search: query.get("search").map(|search| search.trim().to_string()),
        page: text_integer(query, "page"),
        limit: text_integer(query, "limit"),
    }
}

async fn list_exercises(
    State(state): State<AppState>,
    localized: Localized,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Reply> {
    check(&schemas::exercises_query(), &Value::Null, &HashMap::new(), &query)?;

    let exercises = state.db.list_exercises(&filter_from_query(&query)).await?;
    Ok(localized.ok(&exercises, keys::EXERCISE_LIST))
}

async fn ensure_program(state: &AppState, program_id: Option<i64>) -> AppResult<()> {
    if let Some(program_id) = program_id {
        if state.db.find_program(program_id).await?.is_none() {
            return Err(AppError::NotFound(keys::PROGRAM_NOT_FOUND));
        }
    }
    Ok(())
}

async fn create_exercise(
    State(state): State<AppState>,
    localized: Localized,
    user: AuthUser,
    JsonBody(body): JsonBody,
) -> AppResult<Reply> {
    user.require_role(&[UserRole::Admin])?;
    check(&schemas::create_exercise(), &body, &HashMap::new(), &HashMap::new())?;

    let program_id = integer(&body, "programID");
    ensure_program(&state, program_id).await?;

    let name = trimmed_string(&body, "name").unwrap_or_default();
    let difficulty = raw_string(&body, "difficulty")
        .as_deref()
        .and_then(Difficulty::parse)
        .unwrap_or(Difficulty::Easy);

    let exercise = state
        .db
        .create_exercise(&name, difficulty, program_id)
        .await?;
    info!(exercise_id = exercise.id, "Exercise created");
    Ok(localized.created(&exercise, keys::EXERCISE_CREATED))
}

async fn update_exercise(
    State(state): State<AppState>,
    localized: Localized,
    user: AuthUser,
    Path(params): Path<HashMap<String, String>>,
    JsonBody(body): JsonBody,
) -> AppResult<Reply> {
    user.require_role(&[UserRole::Admin])?;
    check(&schemas::update_exercise(), &body, &params, &HashMap::new())?;

    let id = path_id(&params, "id");
    if state.db.find_exercise(id).await?.is_none() {
        return Err(AppError::NotFound(keys::EXERCISE_NOT_FOUND));
    }

    let changes = ExerciseChanges {
        name: trimmed_string(&body, "name"),
        difficulty: raw_string(&body, "difficulty")
            .as_deref()
            .and_then(Difficulty::parse),
        program_id: integer(&body, "programID"),
    };
    ensure_program(&state, changes.program_id).await?;

    let exercise = state
        .db
        .update_exercise(id, &changes)
        .await?
        .ok_or(AppError::NotFound(keys::EXERCISE_NOT_FOUND))?;
    Ok(localized.ok(&exercise, keys::EXERCISE_UPDATED))
}

async fn delete_exercise(
    State(state): State<AppState>,
    localized: Localized,
    user: AuthUser,
    Path(params): Path<HashMap<String, String>>,
) -> AppResult<Reply> {
    user.require_role(&[UserRole::Admin])?;
    check(&schemas::delete_exercise(), &Value::Null, &params, &HashMap::new())?;

    let id = path_id(&params, "id");
    if !state.db.delete_exercise(id).await? {
        return Err(AppError::NotFound(keys::EXERCISE_NOT_FOUND));
    }
    info!(exercise_id = id, "Exercise deleted");
    Ok(localized.message(keys::EXERCISE_DELETED))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Filter Tests ====================

    #[test]
    fn test_filter_from_query() {
        let query: HashMap<String, String> = [
            ("programID", "2"),
            ("search", "  squat "),
            ("page", "3"),
            ("limit", "10"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let filter = filter_from_query(&query);
        assert_eq!(
            filter,
            ExerciseFilter {
                program_id: Some(2),
                search: Some("squat".to_string()),
                page: Some(3),
                limit: Some(10),
            }
        );
        assert_eq!(filter.offset(), Some(20));
    }

    #[test]
    fn test_filter_from_empty_query() {
        assert_eq!(filter_from_query(&HashMap::new()), ExerciseFilter::default());
    }
}
