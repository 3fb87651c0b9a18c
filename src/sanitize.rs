//! Response sanitization.
//!
//! Every JSON body leaving the server is rewritten without the keys in
//! [`SENSITIVE_KEYS`], at any depth. Values are first converted to plain JSON
//! through [`PlainData`], then walked as primitives, arrays and ordered maps.

use crate::errors::AppError;
use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Keys removed from every outgoing object.
pub const SENSITIVE_KEYS: &[&str] = &["password", "passwordHash"];

/// Nesting depth past which values are replaced by `null`.
pub const MAX_DEPTH: usize = 64;

/// Largest response body the middleware will buffer.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Conversion of domain values to plain JSON before filtering.
pub trait PlainData {
    fn to_plain(&self) -> Result<Value, serde_json::Error>;
}

impl<T: Serialize + ?Sized> PlainData for T {
    fn to_plain(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Convert `data` to plain JSON and strip sensitive keys.
pub fn sanitize<T: PlainData + ?Sized>(data: &T) -> Result<Value, serde_json::Error> {
    Ok(sanitize_value(&data.to_plain()?))
}

/// Copy `value`, dropping sensitive keys at every depth.
pub fn sanitize_value(value: &Value) -> Value {
    sanitize_at(value, 0)
}

fn sanitize_at(value: &Value, depth: usize) -> Value {
    if depth > MAX_DEPTH {
        warn!(max_depth = MAX_DEPTH, "Response nesting too deep, truncating");
        return Value::Null;
    }

    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| sanitize_at(item, depth + 1))
                .collect(),
        ),
        Value::Object(map) => {
            let mut clean = Map::with_capacity(map.len());
            for (key, item) in map {
                if SENSITIVE_KEYS.contains(&key.as_str()) {
                    continue;
                }
                clean.insert(key.clone(), sanitize_at(item, depth + 1));
            }
            Value::Object(clean)
        }
        primitive => primitive.clone(),
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

/// Middleware rewriting JSON response bodies through [`sanitize_value`].
///
/// Non-JSON responses and bodies that do not parse pass through untouched.
pub async fn sanitize_response(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if !is_json(response.headers()) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return AppError::Internal(anyhow::anyhow!("Failed to buffer response body: {e}"))
                .into_response();
        }
    };

    let parsed: Value = match serde_json::from_slice(&bytes) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("Response body is not valid JSON, passing through: {}", e);
            return Response::from_parts(parts, Body::from(bytes));
        }
    };

    match serde_json::to_vec(&sanitize_value(&parsed)) {
        Ok(clean) => {
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(clean))
        }
        Err(e) => AppError::Internal(anyhow::anyhow!("Failed to serialize sanitized body: {e}"))
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    // ==================== Key Removal Tests ====================

    #[test]
    fn test_removes_nested_password_hash() {
        let input = json!({"data": {"user": {"passwordHash": "x", "name": "A"}}});
        assert_eq!(
            sanitize_value(&input),
            json!({"data": {"user": {"name": "A"}}})
        );
    }

    #[test]
    fn test_removes_keys_inside_arrays() {
        let input = json!([
            {"id": 1, "password": "p1"},
            {"id": 2, "nested": [{"passwordHash": "h", "ok": true}]}
        ]);
        assert_eq!(
            sanitize_value(&input),
            json!([{"id": 1}, {"id": 2, "nested": [{"ok": true}]}])
        );
    }

    #[test]
    fn test_keeps_similar_keys() {
        let input = json!({"Password": 1, "password_hash": 2, "passwordHint": 3});
        assert_eq!(sanitize_value(&input), input);
    }

    #[test]
    fn test_primitives_unchanged() {
        for value in [json!(null), json!(true), json!(3.5), json!("password")] {
            assert_eq!(sanitize_value(&value), value);
        }
    }

    #[test]
    fn test_preserves_key_order() {
        let input = json!({"z": 1, "password": "x", "a": 2, "m": 3});
        let output = sanitize_value(&input);
        let keys: Vec<&str> = output
            .as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    // ==================== Depth Guard Tests ====================

    #[test]
    fn test_depth_guard_truncates() {
        let mut value = json!("leaf");
        for _ in 0..(MAX_DEPTH + 10) {
            value = json!([value]);
        }
        let sanitized = sanitize_value(&value);

        let mut cursor = &sanitized;
        let mut depth = 0;
        while let Some(inner) = cursor.as_array().and_then(|items| items.first()) {
            cursor = inner;
            depth += 1;
        }
        // Arrays at depths 0..=MAX_DEPTH survive; the value below them is cut
        assert_eq!(depth, MAX_DEPTH + 1);
        assert_eq!(*cursor, Value::Null);
    }

    #[test]
    fn test_depth_within_limit_untouched() {
        let mut value = json!({"passwordHash": "x", "v": 1});
        for _ in 0..10 {
            value = json!({"inner": value});
        }
        let mut expected = json!({"v": 1});
        for _ in 0..10 {
            expected = json!({"inner": expected});
        }
        assert_eq!(sanitize_value(&value), expected);
    }

    // ==================== PlainData Tests ====================

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Account {
        id: i64,
        nick_name: String,
        password_hash: String,
    }

    #[test]
    fn test_sanitize_serializable_model() {
        let account = Account {
            id: 7,
            nick_name: "jd".to_string(),
            password_hash: "$2b$10$abc".to_string(),
        };
        let value = sanitize(&vec![account]).unwrap();
        assert_eq!(value, json!([{"id": 7, "nickName": "jd"}]));
    }

    fn arbitrary_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-z]{0,8}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::vec(
                    (prop_oneof![Just("password".to_string()), Just("passwordHash".to_string()), "[a-z]{1,6}"], inner),
                    0..6
                )
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        })
    }

    fn contains_sensitive_key(value: &Value) -> bool {
        match value {
            Value::Array(items) => items.iter().any(contains_sensitive_key),
            Value::Object(map) => map
                .iter()
                .any(|(key, item)| SENSITIVE_KEYS.contains(&key.as_str()) || contains_sensitive_key(item)),
            _ => false,
        }
    }

    proptest! {
        #[test]
        fn prop_no_sensitive_keys_survive(value in arbitrary_json()) {
            prop_assert!(!contains_sensitive_key(&sanitize_value(&value)));
        }

        #[test]
        fn prop_sanitize_is_idempotent(value in arbitrary_json()) {
            let once = sanitize_value(&value);
            prop_assert_eq!(sanitize_value(&once), once.clone());
        }
    }
}
