//! Request handlers, one module per entity.
//!
//! Handlers stay thin: parse path, query, and body, call the action layer,
//! serialize the result. Validation, authorization, and change-log entries
//! all happen in the actions; nothing here touches the database directly.

pub mod change;
pub mod configuration;
pub mod dashboard;
pub mod file;
pub mod lender;
pub mod loan;
pub mod note;
pub mod project;
pub mod template;
pub mod transaction;
pub mod view;

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use soli_actions::error::ActionError;

/// Liveness probe. Unauthenticated, no database access.
pub async fn healthz() -> &'static str {
    "ok"
}

/// Insert the path id into a JSON body under the input's id field name.
/// Non-object bodies pass through untouched; schema validation rejects them
/// downstream with a proper error.
pub fn body_with_id(mut body: Value, key: &str, id: &str) -> Value {
    if let Value::Object(ref mut map) = body {
        map.insert(key.to_string(), Value::String(id.to_string()));
    }
    body
}

pub fn require_param<'a>(
    params: &'a HashMap<String, String>,
    key: &str,
) -> Result<&'a str, ActionError> {
    params
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| ActionError::Validation(vec![format!("{key} query parameter is required")]))
}

/// Parse an optional query parameter whose type deserializes from a bare
/// string (the snake_case enums).
pub fn enum_param<T: DeserializeOwned>(
    params: &HashMap<String, String>,
    key: &str,
) -> Result<Option<T>, ActionError> {
    match params.get(key) {
        None => Ok(None),
        Some(raw) => serde_json::from_value(Value::String(raw.clone()))
            .map(Some)
            .map_err(|_| ActionError::Validation(vec![format!("{key}: unknown value '{raw}'")])),
    }
}

pub fn limit_param(params: &HashMap<String, String>) -> Result<Option<u32>, ActionError> {
    params
        .get("limit")
        .map(|raw| {
            raw.parse::<u32>()
                .map_err(|_| ActionError::Validation(vec![format!("limit: not a number '{raw}'")]))
        })
        .transpose()
}
