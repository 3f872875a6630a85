/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `users`: Current user and user administration
/// - `teams`: Teams and membership
/// - `projects`: Projects of a team
/// - `tasks`: Tasks and comments
///
/// Handlers stay thin: they merge path parameters into the raw payload,
/// validate it into a typed input, call the matching operation and
/// populate relations for the response.

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod teams;
pub mod users;

use axum::{extract::rejection::JsonRejection, Json};
use serde_json::{Map, Value};
use taskgate_shared::validation::{validate, Shaped};

use crate::error::ApiResult;

/// Unwraps a JSON body, turning malformed JSON into `400`
pub(crate) fn body(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    let Json(value) = payload?;
    Ok(value)
}

/// Merges path parameters into a payload object
///
/// Path values win over body fields of the same name. Non-object payloads
/// are returned untouched so validation can reject them.
pub(crate) fn with_path(payload: Value, params: &[(&str, &str)]) -> Value {
    match payload {
        Value::Object(mut map) => {
            for (name, value) in params {
                map.insert((*name).to_string(), Value::String((*value).to_string()));
            }
            Value::Object(map)
        }
        other => other,
    }
}

/// Payload made only of path parameters
pub(crate) fn path_only(params: &[(&str, &str)]) -> Value {
    with_path(Value::Object(Map::new()), params)
}

/// Validates a raw payload into a typed input
pub(crate) fn input<T: Shaped>(raw: Value) -> ApiResult<T> {
    Ok(validate(raw)?)
}
