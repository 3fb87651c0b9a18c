//! Localized message tables.
//!
//! Each table maps a message key to its template for one language. Keys are
//! the English phrases themselves, so the English table is mostly an identity
//! mapping; it still lists every key so that lookups are counted as hits and
//! field names get their display labels.

/// Message keys used by the route handlers and the auth layer.
pub mod keys {
    // ==================== Auth ====================
    pub const AUTH_TOKEN_MISSING: &str = "Authentication token missing";
    pub const INVALID_OR_EXPIRED_TOKEN: &str = "Invalid or expired token";
    pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";
    pub const FORBIDDEN: &str = "Forbidden";
    pub const EMAIL_ALREADY_EXISTS: &str = "User with given email already exists";
    pub const REGISTERED: &str = "You have successfully registered";
    pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
    pub const LOGGED_IN: &str = "You have successfully logged in";

    // ==================== Generic ====================
    pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";
    pub const INVALID_REQUEST_BODY: &str = "Invalid request body";
    pub const ROUTE_NOT_FOUND: &str = "Route not found";
    pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";

    // ==================== Users ====================
    pub const USER_LIST: &str = "List of users";
    pub const USER_NOT_FOUND: &str = "User not found";
    pub const USER_PROFILE: &str = "User profile";
    pub const USER_DETAIL: &str = "User detail";
    pub const USER_UPDATED: &str = "User updated";

    // ==================== Programs ====================
    pub const PROGRAM_LIST: &str = "List of programs";
    pub const PROGRAM_NOT_FOUND: &str = "Program not found";
    pub const EXERCISE_ADDED_TO_PROGRAM: &str = "Exercise added to program";
    pub const EXERCISE_NOT_IN_PROGRAM: &str = "Exercise not found in given program";
    pub const EXERCISE_REMOVED_FROM_PROGRAM: &str = "Exercise removed from program";

    // ==================== Exercises ====================
    pub const EXERCISE_LIST: &str = "List of exercises";
    pub const EXERCISE_CREATED: &str = "Exercise created";
    pub const EXERCISE_NOT_FOUND: &str = "Exercise not found";
    pub const EXERCISE_UPDATED: &str = "Exercise updated";
    pub const EXERCISE_DELETED: &str = "Exercise deleted";

    // ==================== User Exercises ====================
    pub const COMPLETED_EXERCISE_LIST: &str = "List of completed exercises";
    pub const EXERCISE_TRACKED: &str = "Exercise tracked as completed";
    pub const USER_EXERCISE_NOT_FOUND: &str = "User completed exercise not found";
    pub const USER_EXERCISE_NOT_OWNED: &str = "User can remove only his own completed exercises";
    pub const USER_EXERCISE_DELETED: &str = "User exercise deleted";
}

/// Canonical validation templates.
pub mod templates {
    pub const REQUIRED: &str = "{fieldName} is required";
    pub const NOT_EMPTY: &str = "{fieldName} cannot be empty";
    pub const POSITIVE_INTEGER: &str = "{fieldName} must be a positive integer";
    pub const NON_NEGATIVE_INTEGER: &str = "{fieldName} must be a non-negative integer";
    pub const VALID_EMAIL: &str = "{fieldName} must be a valid email";
    pub const MIN_LENGTH: &str = "{fieldName} must be at least {min} characters long";
    pub const BETWEEN: &str = "{fieldName} must be between {min} and {max}";
    pub const ISO8601_DATE: &str = "{fieldName} must be a valid ISO8601 date";
    pub const INVALID: &str = "Invalid {fieldName}";
}

/// English table (default language).
pub const ENGLISH: &[(&str, &str)] = &[
    // Validation templates
    (templates::REQUIRED, "{fieldName} is required"),
    (templates::NOT_EMPTY, "{fieldName} cannot be empty"),
    (templates::POSITIVE_INTEGER, "{fieldName} must be a positive integer"),
    (templates::NON_NEGATIVE_INTEGER, "{fieldName} must be a non-negative integer"),
    (templates::VALID_EMAIL, "{fieldName} must be a valid email"),
    (templates::MIN_LENGTH, "{fieldName} must be at least {min} characters long"),
    (templates::BETWEEN, "{fieldName} must be between {min} and {max}"),
    (templates::ISO8601_DATE, "{fieldName} must be a valid ISO8601 date"),
    (templates::INVALID, "Invalid {fieldName}"),
    // Field names
    ("name", "Name"),
    ("surname", "Surname"),
    ("nickName", "Nickname"),
    ("email", "Email"),
    ("age", "Age"),
    ("role", "Role"),
    ("password", "Password"),
    ("difficulty", "Difficulty"),
    ("programID", "Program ID"),
    ("programId", "Program ID"),
    ("exerciseId", "Exercise ID"),
    ("id", "ID"),
    ("durationSeconds", "Duration in seconds"),
    ("completedAt", "Completed at"),
    ("page", "Page"),
    ("limit", "Limit"),
    ("search", "Search"),
    // Messages
    (keys::AUTH_TOKEN_MISSING, "Authentication token missing"),
    (keys::INVALID_OR_EXPIRED_TOKEN, "Invalid or expired token"),
    (keys::AUTHENTICATION_REQUIRED, "Authentication required"),
    (keys::FORBIDDEN, "Forbidden"),
    (keys::EMAIL_ALREADY_EXISTS, "User with given email already exists"),
    (keys::REGISTERED, "You have successfully registered"),
    (keys::INVALID_CREDENTIALS, "Invalid credentials"),
    (keys::LOGGED_IN, "You have successfully logged in"),
    (keys::SOMETHING_WENT_WRONG, "Something went wrong"),
    (keys::INVALID_REQUEST_BODY, "Invalid request body"),
    (keys::ROUTE_NOT_FOUND, "Route not found"),
    (keys::METHOD_NOT_ALLOWED, "Method not allowed"),
    (keys::USER_LIST, "List of users"),
    (keys::USER_NOT_FOUND, "User not found"),
    (keys::USER_PROFILE, "User profile"),
    (keys::USER_DETAIL, "User detail"),
    (keys::USER_UPDATED, "User updated"),
    (keys::PROGRAM_LIST, "List of programs"),
    (keys::PROGRAM_NOT_FOUND, "Program not found"),
    (keys::EXERCISE_ADDED_TO_PROGRAM, "Exercise added to program"),
    (keys::EXERCISE_NOT_IN_PROGRAM, "Exercise not found in given program"),
    (keys::EXERCISE_REMOVED_FROM_PROGRAM, "Exercise removed from program"),
    (keys::EXERCISE_LIST, "List of exercises"),
    (keys::EXERCISE_CREATED, "Exercise created"),
    (keys::EXERCISE_NOT_FOUND, "Exercise not found"),
    (keys::EXERCISE_UPDATED, "Exercise updated"),
    (keys::EXERCISE_DELETED, "Exercise deleted"),
    (keys::COMPLETED_EXERCISE_LIST, "List of completed exercises"),
    (keys::EXERCISE_TRACKED, "Exercise tracked as completed"),
    (keys::USER_EXERCISE_NOT_FOUND, "User completed exercise not found"),
    (keys::USER_EXERCISE_NOT_OWNED, "User can remove only his own completed exercises"),
    (keys::USER_EXERCISE_DELETED, "User exercise deleted"),
];

/// Slovak table.
pub const SLOVAK: &[(&str, &str)] = &[
    // Validation templates
    (templates::REQUIRED, "{fieldName} je povinné pole"),
    (templates::NOT_EMPTY, "{fieldName} nemôže byť prázdne"),
    (templates::POSITIVE_INTEGER, "{fieldName} musí byť kladné celé číslo"),
    (templates::NON_NEGATIVE_INTEGER, "{fieldName} musí byť nezáporné celé číslo"),
    (templates::VALID_EMAIL, "{fieldName} musí byť platná emailová adresa"),
    (templates::MIN_LENGTH, "{fieldName} musí mať aspoň {min} znakov"),
    (templates::BETWEEN, "{fieldName} musí byť medzi {min} a {max}"),
    (templates::ISO8601_DATE, "{fieldName} musí byť platný dátum vo formáte ISO8601"),
    (templates::INVALID, "Neplatná hodnota poľa {fieldName}"),
    // Field names
    ("name", "Meno"),
    ("surname", "Priezvisko"),
    ("nickName", "Prezývka"),
    ("email", "Email"),
    ("age", "Vek"),
    ("role", "Rola"),
    ("password", "Heslo"),
    ("difficulty", "Náročnosť"),
    ("programID", "ID programu"),
    ("programId", "ID programu"),
    ("exerciseId", "ID cvičenia"),
    ("id", "ID"),
    ("durationSeconds", "Trvanie v sekundách"),
    ("completedAt", "Dátum dokončenia"),
    ("page", "Strana"),
    ("limit", "Limit"),
    ("search", "Vyhľadávanie"),
    // Messages
    (keys::AUTH_TOKEN_MISSING, "Chýba autentifikačný token"),
    (keys::INVALID_OR_EXPIRED_TOKEN, "Neplatný alebo expirovaný token"),
    (keys::AUTHENTICATION_REQUIRED, "Vyžaduje sa prihlásenie"),
    (keys::FORBIDDEN, "Prístup zamietnutý"),
    (keys::EMAIL_ALREADY_EXISTS, "Používateľ s týmto emailom už existuje"),
    (keys::REGISTERED, "Úspešne ste sa zaregistrovali"),
    (keys::INVALID_CREDENTIALS, "Neplatné prihlasovacie údaje"),
    (keys::LOGGED_IN, "Úspešne ste sa prihlásili"),
    (keys::SOMETHING_WENT_WRONG, "Niečo sa pokazilo"),
    (keys::INVALID_REQUEST_BODY, "Neplatné telo požiadavky"),
    (keys::ROUTE_NOT_FOUND, "Cesta neexistuje"),
    (keys::METHOD_NOT_ALLOWED, "Metóda nie je povolená"),
    (keys::USER_LIST, "Zoznam používateľov"),
    (keys::USER_NOT_FOUND, "Používateľ nebol nájdený"),
    (keys::USER_PROFILE, "Profil používateľa"),
    (keys::USER_DETAIL, "Detail používateľa"),
    (keys::USER_UPDATED, "Používateľ bol upravený"),
    (keys::PROGRAM_LIST, "Zoznam programov"),
    (keys::PROGRAM_NOT_FOUND, "Program nebol nájdený"),
    (keys::EXERCISE_ADDED_TO_PROGRAM, "Cvičenie bolo pridané do programu"),
    (keys::EXERCISE_NOT_IN_PROGRAM, "Cvičenie sa v danom programe nenachádza"),
    (keys::EXERCISE_REMOVED_FROM_PROGRAM, "Cvičenie bolo odstránené z programu"),
    (keys::EXERCISE_LIST, "Zoznam cvičení"),
    (keys::EXERCISE_CREATED, "Cvičenie bolo vytvorené"),
    (keys::EXERCISE_NOT_FOUND, "Cvičenie nebolo nájdené"),
    (keys::EXERCISE_UPDATED, "Cvičenie bolo upravené"),
    (keys::EXERCISE_DELETED, "Cvičenie bolo odstránené"),
    (keys::COMPLETED_EXERCISE_LIST, "Zoznam dokončených cvičení"),
    (keys::EXERCISE_TRACKED, "Cvičenie bolo zaznamenané ako dokončené"),
    (keys::USER_EXERCISE_NOT_FOUND, "Dokončené cvičenie nebolo nájdené"),
    (keys::USER_EXERCISE_NOT_OWNED, "Používateľ môže odstrániť iba vlastné dokončené cvičenia"),
    (keys::USER_EXERCISE_DELETED, "Dokončené cvičenie bolo odstránené"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn key_set(table: &[(&'static str, &str)]) -> HashSet<&'static str> {
        table.iter().map(|(key, _)| *key).collect()
    }

    // ==================== Coverage Tests ====================

    #[test]
    fn test_tables_have_the_same_keys() {
        assert_eq!(key_set(ENGLISH), key_set(SLOVAK));
    }

    #[test]
    fn test_tables_have_no_duplicate_keys() {
        assert_eq!(key_set(ENGLISH).len(), ENGLISH.len());
        assert_eq!(key_set(SLOVAK).len(), SLOVAK.len());
    }

    #[test]
    fn test_no_empty_values() {
        for (key, value) in ENGLISH.iter().chain(SLOVAK) {
            assert!(!value.is_empty(), "empty translation for {key}");
        }
    }

    // ==================== Placeholder Tests ====================

    #[test]
    fn test_templates_keep_their_placeholders() {
        for table in [ENGLISH, SLOVAK] {
            for (key, value) in table.iter() {
                for placeholder in ["{fieldName}", "{min}", "{max}"] {
                    assert_eq!(
                        key.contains(placeholder),
                        value.contains(placeholder),
                        "placeholder {placeholder} mismatch for {key}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_english_messages_are_identity() {
        for (key, value) in ENGLISH {
            if key.contains(' ') {
                assert_eq!(key, value);
            }
        }
    }
}
