use crate::models::{
    Difficulty, Exercise, ExerciseChanges, ExerciseFilter, ExerciseWithProgram, NewUser, Program,
    User, UserChanges, UserExercise, UserExerciseWithExercise, UserProfile, UserSummary,
};
use crate::retry::{with_retry_if, RetryConfig};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use tracing::{info, warn};

const USER_COLUMNS: &str =
    "id, name, surname, nick_name, email, age, role, password_hash, created_at, updated_at";
const PROGRAM_COLUMNS: &str = "id, name, created_at, updated_at";
const EXERCISE_COLUMNS: &str = "id, name, difficulty, program_id, created_at, updated_at";
const USER_EXERCISE_COLUMNS: &str =
    "id, user_id, exercise_id, completed_at, duration_seconds, created_at, updated_at";

/// Statements creating the schema; each is safe to run repeatedly.
const SCHEMA: &[(&str, &str)] = &[
    (
        "user_role type",
        "DO $$ BEGIN
            CREATE TYPE user_role AS ENUM ('USER', 'ADMIN');
        EXCEPTION WHEN duplicate_object THEN NULL;
        END $$",
    ),
    (
        "exercise_difficulty type",
        "DO $$ BEGIN
            CREATE TYPE exercise_difficulty AS ENUM ('EASY', 'MEDIUM', 'HARD');
        EXCEPTION WHEN duplicate_object THEN NULL;
        END $$",
    ),
    (
        "users table",
        "CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(200) NOT NULL,
            surname VARCHAR(200) NOT NULL,
            nick_name VARCHAR(200) NOT NULL UNIQUE,
            email VARCHAR(255) NOT NULL UNIQUE,
            age INTEGER NOT NULL CHECK (age >= 0),
            role user_role NOT NULL,
            password_hash VARCHAR(255) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ
        )",
    ),
    (
        "programs table",
        "CREATE TABLE IF NOT EXISTS programs (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(200) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ
        )",
    ),
    (
        "exercises table",
        "CREATE TABLE IF NOT EXISTS exercises (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(200) NOT NULL,
            difficulty exercise_difficulty NOT NULL,
            program_id BIGINT REFERENCES programs(id) ON DELETE SET NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ
        )",
    ),
    (
        "exercises name index",
        "CREATE INDEX IF NOT EXISTS exercises_name_idx ON exercises USING btree (name)",
    ),
    (
        "user_exercises table",
        "CREATE TABLE IF NOT EXISTS user_exercises (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id),
            exercise_id BIGINT NOT NULL REFERENCES exercises(id),
            completed_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            duration_seconds INTEGER NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ
        )",
    ),
];

/// Programs created by the seed.
pub const SEED_PROGRAMS: [&str; 3] = ["Program 1", "Program 2", "Program 3"];

/// Exercises created by the seed: name, difficulty, index into [`SEED_PROGRAMS`].
pub const SEED_EXERCISES: [(&str, Difficulty, usize); 6] = [
    ("Exercise 1", Difficulty::Easy, 0),
    ("Exercise 2", Difficulty::Easy, 1),
    ("Exercise 3", Difficulty::Medium, 0),
    ("Exercise 4", Difficulty::Medium, 1),
    ("Exercise 5", Difficulty::Hard, 0),
    ("Exercise 6", Difficulty::Hard, 1),
];

/// Whether a connection error is worth retrying.
fn is_transient(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::Tls(_)
    )
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL, retrying while the server is unreachable.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = with_retry_if(
            &RetryConfig::database_connect(),
            "Database connect",
            || PgPoolOptions::new().max_connections(10).connect(database_url),
            is_transient,
        )
        .await
        .context("Failed to connect to database")?;

        info!("Connected to database");
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create types, tables and indexes that do not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        for (name, statement) in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to create {}", name))?;
        }
        info!("Database schema ready");
        Ok(())
    }

    /// Create the trigram index used by name search.
    ///
    /// Needs the `pg_trgm` extension; without it searches fall back to the
    /// B-tree name index, so failure is only logged.
    pub async fn create_search_indexes(&self) {
        let result = async {
            sqlx::query("CREATE EXTENSION IF NOT EXISTS pg_trgm")
                .execute(&self.pool)
                .await?;
            sqlx::query(
                "CREATE INDEX IF NOT EXISTS exercises_name_trgm_idx
                 ON exercises USING gin (name gin_trgm_ops)",
            )
            .execute(&self.pool)
            .await
        }
        .await;

        match result {
            Ok(_) => info!("Search indexes created"),
            Err(e) => warn!(
                "Could not create trigram index for exercises.name, B-tree index will be used: {}",
                e
            ),
        }
    }

    // ==================== Users ====================

    pub async fn find_user(&self, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn find_user_by_email(&self, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn find_user_profile(&self, id: i64) -> sqlx::Result<Option<UserProfile>> {
        sqlx::query_as(
            "SELECT name, surname, age, nick_name FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list_users(&self) -> sqlx::Result<Vec<User>> {
        sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
    }

    pub async fn list_user_summaries(&self) -> sqlx::Result<Vec<UserSummary>> {
        sqlx::query_as("SELECT id, nick_name FROM users WHERE deleted_at IS NULL ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn create_user(&self, user: &NewUser) -> sqlx::Result<User> {
        sqlx::query_as(&format!(
            "INSERT INTO users (name, surname, nick_name, email, age, role, password_hash)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.surname)
        .bind(&user.nick_name)
        .bind(&user.email)
        .bind(user.age)
        .bind(user.role)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
    }

    /// Apply `changes` to a user; `None` if the user does not exist.
    pub async fn update_user(&self, id: i64, changes: &UserChanges) -> sqlx::Result<Option<User>> {
        sqlx::query_as(&format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                surname = COALESCE($3, surname),
                nick_name = COALESCE($4, nick_name),
                age = COALESCE($5, age),
                role = COALESCE($6, role),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.surname)
        .bind(&changes.nick_name)
        .bind(changes.age)
        .bind(changes.role)
        .fetch_optional(&self.pool)
        .await
    }

    // ==================== Programs ====================

    pub async fn list_programs(&self) -> sqlx::Result<Vec<Program>> {
        sqlx::query_as(&format!(
            "SELECT {PROGRAM_COLUMNS} FROM programs WHERE deleted_at IS NULL ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
    }

    pub async fn find_program(&self, id: i64) -> sqlx::Result<Option<Program>> {
        sqlx::query_as(&format!(
            "SELECT {PROGRAM_COLUMNS} FROM programs WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn programs_by_id(&self, ids: &[i64]) -> sqlx::Result<HashMap<i64, Program>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let programs: Vec<Program> = sqlx::query_as(&format!(
            "SELECT {PROGRAM_COLUMNS} FROM programs WHERE id = ANY($1) AND deleted_at IS NULL"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(programs.into_iter().map(|p| (p.id, p)).collect())
    }

    // ==================== Exercises ====================

    pub async fn list_exercises(
        &self,
        filter: &ExerciseFilter,
    ) -> sqlx::Result<Vec<ExerciseWithProgram>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE deleted_at IS NULL"
        ));
        if let Some(program_id) = filter.program_id {
            query.push(" AND program_id = ").push_bind(program_id);
        }
        if let Some(search) = &filter.search {
            query
                .push(" AND name ILIKE ")
                .push_bind(format!("%{}%", escape_like(search)));
        }
        query.push(" ORDER BY id");
        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit);
        }
        if let Some(offset) = filter.offset() {
            query.push(" OFFSET ").push_bind(offset);
        }

        let exercises: Vec<Exercise> = query.build_query_as().fetch_all(&self.pool).await?;

        let mut program_ids: Vec<i64> = exercises.iter().filter_map(|e| e.program_id).collect();
        program_ids.sort_unstable();
        program_ids.dedup();
        let programs = self.programs_by_id(&program_ids).await?;

        Ok(exercises
            .into_iter()
            .map(|exercise| {
                let program = exercise
                    .program_id
                    .and_then(|id| programs.get(&id).cloned());
                ExerciseWithProgram { exercise, program }
            })
            .collect())
    }

    pub async fn find_exercise(&self, id: i64) -> sqlx::Result<Option<Exercise>> {
        sqlx::query_as(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn create_exercise(
        &self,
        name: &str,
        difficulty: Difficulty,
        program_id: Option<i64>,
    ) -> sqlx::Result<Exercise> {
        sqlx::query_as(&format!(
            "INSERT INTO exercises (name, difficulty, program_id)
             VALUES ($1, $2, $3)
             RETURNING {EXERCISE_COLUMNS}"
        ))
        .bind(name)
        .bind(difficulty)
        .bind(program_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Apply `changes`; a `None` program keeps the current assignment.
    pub async fn update_exercise(
        &self,
        id: i64,
        changes: &ExerciseChanges,
    ) -> sqlx::Result<Option<Exercise>> {
        sqlx::query_as(&format!(
            "UPDATE exercises SET
                name = COALESCE($2, name),
                difficulty = COALESCE($3, difficulty),
                program_id = COALESCE($4, program_id),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {EXERCISE_COLUMNS}"
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(changes.difficulty)
        .bind(changes.program_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Assign an exercise to a program, or detach it with `None`.
    pub async fn set_exercise_program(
        &self,
        id: i64,
        program_id: Option<i64>,
    ) -> sqlx::Result<Option<Exercise>> {
        sqlx::query_as(&format!(
            "UPDATE exercises SET program_id = $2, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {EXERCISE_COLUMNS}"
        ))
        .bind(id)
        .bind(program_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Soft-delete an exercise. Returns false if it did not exist.
    pub async fn delete_exercise(&self, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query(
            "UPDATE exercises SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ==================== User Exercises ====================

    pub async fn list_user_exercises(
        &self,
        user_id: i64,
    ) -> sqlx::Result<Vec<UserExerciseWithExercise>> {
        let tracked: Vec<UserExercise> = sqlx::query_as(&format!(
            "SELECT {USER_EXERCISE_COLUMNS} FROM user_exercises
             WHERE user_id = $1 AND deleted_at IS NULL ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut exercise_ids: Vec<i64> = tracked.iter().map(|t| t.exercise_id).collect();
        exercise_ids.sort_unstable();
        exercise_ids.dedup();

        let exercises: Vec<Exercise> = if exercise_ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as(&format!(
                "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = ANY($1) AND deleted_at IS NULL"
            ))
            .bind(&exercise_ids)
            .fetch_all(&self.pool)
            .await?
        };
        let exercises: HashMap<i64, Exercise> = exercises.into_iter().map(|e| (e.id, e)).collect();

        Ok(tracked
            .into_iter()
            .map(|user_exercise| {
                let exercise = exercises.get(&user_exercise.exercise_id).cloned();
                UserExerciseWithExercise {
                    user_exercise,
                    exercise,
                }
            })
            .collect())
    }

    pub async fn find_user_exercise(&self, id: i64) -> sqlx::Result<Option<UserExercise>> {
        sqlx::query_as(&format!(
            "SELECT {USER_EXERCISE_COLUMNS} FROM user_exercises WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn create_user_exercise(
        &self,
        user_id: i64,
        exercise_id: i64,
        duration_seconds: i32,
        completed_at: DateTime<Utc>,
    ) -> sqlx::Result<UserExercise> {
        sqlx::query_as(&format!(
            "INSERT INTO user_exercises (user_id, exercise_id, duration_seconds, completed_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_EXERCISE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(exercise_id)
        .bind(duration_seconds)
        .bind(completed_at)
        .fetch_one(&self.pool)
        .await
    }

    /// Soft-delete a tracked exercise. Returns false if it did not exist.
    pub async fn delete_user_exercise(&self, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query(
            "UPDATE user_exercises SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ==================== Seeding ====================

    /// Empty every table and insert the demo programs and exercises.
    pub async fn reset_and_seed(&self) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to start transaction")?;

        sqlx::query("TRUNCATE user_exercises, exercises, programs, users RESTART IDENTITY CASCADE")
            .execute(&mut *tx)
            .await
            .context("Failed to clear tables")?;

        let mut program_ids = Vec::with_capacity(SEED_PROGRAMS.len());
        for name in SEED_PROGRAMS {
            let id: i64 = sqlx::query_scalar("INSERT INTO programs (name) VALUES ($1) RETURNING id")
                .bind(name)
                .fetch_one(&mut *tx)
                .await
                .with_context(|| format!("Failed to insert program {}", name))?;
            program_ids.push(id);
        }

        for (name, difficulty, program) in SEED_EXERCISES {
            sqlx::query("INSERT INTO exercises (name, difficulty, program_id) VALUES ($1, $2, $3)")
                .bind(name)
                .bind(difficulty)
                .bind(program_ids.get(program).copied())
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to insert exercise {}", name))?;
        }

        tx.commit().await.context("Failed to commit seed")?;
        info!(
            programs = SEED_PROGRAMS.len(),
            exercises = SEED_EXERCISES.len(),
            "Seed complete"
        );
        Ok(())
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside ILIKE.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Helper Tests ====================

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("push up"), "push up");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
    }

    #[test]
    fn test_is_transient() {
        assert!(is_transient(&sqlx::Error::PoolTimedOut));
        assert!(is_transient(&sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused"
        ))));
        assert!(!is_transient(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn test_schema_statements_are_idempotent() {
        for (name, statement) in SCHEMA {
            assert!(
                statement.contains("IF NOT EXISTS") || statement.contains("duplicate_object"),
                "{name} is not safe to re-run"
            );
        }
    }

    #[test]
    fn test_seed_data_shape() {
        assert_eq!(SEED_PROGRAMS.len(), 3);
        assert_eq!(SEED_EXERCISES.len(), 6);
        for (_, _, program) in SEED_EXERCISES {
            assert!(program < SEED_PROGRAMS.len());
        }
    }

    #[test]
    fn test_seed_exercises_alternate_first_two_programs() {
        let programs: Vec<usize> = SEED_EXERCISES.iter().map(|(_, _, program)| *program).collect();
        assert_eq!(programs, vec![0, 1, 0, 1, 0, 1]);
        let difficulties: Vec<Difficulty> = SEED_EXERCISES.iter().map(|(_, difficulty, _)| *difficulty).collect();
        assert_eq!(
            difficulties,
            vec![
                Difficulty::Easy,
                Difficulty::Easy,
                Difficulty::Medium,
                Difficulty::Medium,
                Difficulty::Hard,
                Difficulty::Hard,
            ]
        );
    }
}
