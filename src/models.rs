//! Database records as they are stored and serialized.
//!
//! JSON field names are camelCase; foreign keys keep the `programID` /
//! `userID` / `exerciseID` spelling clients use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
        }
    }

    pub fn parse(value: &str) -> Option<UserRole> {
        match value {
            "USER" => Some(UserRole::User),
            "ADMIN" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "exercise_difficulty", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn parse(value: &str) -> Option<Difficulty> {
        match value {
            "EASY" => Some(Difficulty::Easy),
            "MEDIUM" => Some(Difficulty::Medium),
            "HARD" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub nick_name: String,
    pub email: String,
    pub age: i32,
    pub role: UserRole,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What other users may see of a user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub nick_name: String,
}

/// A user's view of their own profile.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub surname: String,
    pub age: i32,
    pub nick_name: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub surname: String,
    pub nick_name: String,
    pub email: String,
    pub age: i32,
    pub role: UserRole,
    pub password_hash: String,
}

/// Partial user update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub nick_name: Option<String>,
    pub age: Option<i32>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub difficulty: Difficulty,
    #[serde(rename = "programID")]
    pub program_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An exercise listed together with its program.
#[derive(Debug, Clone, Serialize)]
pub struct ExerciseWithProgram {
    #[serde(flatten)]
    pub exercise: Exercise,
    pub program: Option<Program>,
}

/// Partial exercise update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ExerciseChanges {
    pub name: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub program_id: Option<i64>,
}

/// Filters for listing exercises.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseFilter {
    pub program_id: Option<i64>,
    /// Case-insensitive substring of the name
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ExerciseFilter {
    /// Rows to skip; pagination only applies when a limit is given.
    pub fn offset(&self) -> Option<i64> {
        self.limit
            .map(|limit| (self.page.unwrap_or(1).max(1) - 1).saturating_mul(limit))
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserExercise {
    pub id: i64,
    #[serde(rename = "userID")]
    pub user_id: i64,
    #[serde(rename = "exerciseID")]
    pub exercise_id: i64,
    pub completed_at: DateTime<Utc>,
    pub duration_seconds: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A completed exercise listed together with the exercise.
#[derive(Debug, Clone, Serialize)]
pub struct UserExerciseWithExercise {
    #[serde(flatten)]
    pub user_exercise: UserExercise,
    pub exercise: Option<Exercise>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::sanitize;
    use chrono::TimeZone;
    use serde_json::json;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    fn exercise(program_id: Option<i64>) -> Exercise {
        Exercise {
            id: 3,
            name: "Squat".to_string(),
            difficulty: Difficulty::Medium,
            program_id,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn test_user_serializes_camel_case_and_sanitizes() {
        let user = User {
            id: 1,
            name: "Jane".to_string(),
            surname: "Doe".to_string(),
            nick_name: "jd".to_string(),
            email: "jane@example.com".to_string(),
            age: 30,
            role: UserRole::Admin,
            password_hash: "$2b$10$hash".to_string(),
            created_at: timestamp(),
            updated_at: timestamp(),
        };

        let raw = serde_json::to_value(&user).unwrap();
        assert_eq!(raw["nickName"], "jd");
        assert_eq!(raw["role"], "ADMIN");
        assert!(raw.get("passwordHash").is_some());

        let clean = sanitize(&user).unwrap();
        assert!(clean.get("passwordHash").is_none());
        assert_eq!(clean["createdAt"], "2024-01-15T10:30:00Z");
    }

    #[test]
    fn test_exercise_with_program_flattens() {
        let listed = ExerciseWithProgram {
            exercise: exercise(None),
            program: None,
        };
        let value = serde_json::to_value(&listed).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["difficulty"], "MEDIUM");
        assert_eq!(value["programID"], json!(null));
        assert_eq!(value["program"], json!(null));
    }

    #[test]
    fn test_user_exercise_key_spelling() {
        let tracked = UserExerciseWithExercise {
            user_exercise: UserExercise {
                id: 9,
                user_id: 2,
                exercise_id: 3,
                completed_at: timestamp(),
                duration_seconds: 90,
                created_at: timestamp(),
                updated_at: timestamp(),
            },
            exercise: Some(exercise(Some(1))),
        };
        let value = serde_json::to_value(&tracked).unwrap();
        assert_eq!(value["userID"], 2);
        assert_eq!(value["exerciseID"], 3);
        assert_eq!(value["durationSeconds"], 90);
        assert_eq!(value["exercise"]["programID"], 1);
    }

    // ==================== Enum Tests ====================

    #[test]
    fn test_role_parse() {
        assert_eq!(UserRole::parse("USER"), Some(UserRole::User));
        assert_eq!(UserRole::parse("ADMIN"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("admin"), None);
        assert_eq!(UserRole::Admin.to_string(), "ADMIN");
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("hard"), None);
    }

    // ==================== Filter Tests ====================

    #[test]
    fn test_filter_offset() {
        let unpaged = ExerciseFilter::default();
        assert_eq!(unpaged.offset(), None);

        let first = ExerciseFilter {
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(first.offset(), Some(0));

        let third = ExerciseFilter {
            page: Some(3),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(third.offset(), Some(20));
    }
}
