/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register a MEMBER account
/// - `POST /v1/auth/login` - Login and get a token
///
/// Both return the same payload:
///
/// ```json
/// {
///   "token": "eyJ...",
///   "user": { "id": "uuid", "name": "Ada", "email": "ada@example.com", "role": "MEMBER", ... }
/// }
/// ```

use super::{body, input};
use crate::{app::AppState, error::ApiResult};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;
use taskgate_shared::ops::{self, auth::AuthPayload};

/// Registration endpoint
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON
/// - `409 Conflict`: Email already in use
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<AuthPayload>> {
    let req = input(body(payload)?)?;
    Ok(Json(ops::auth::register(&state.services, req).await?))
}

/// Login endpoint
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password (indistinguishable)
/// - `422 Unprocessable Entity`: Validation failed
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<AuthPayload>> {
    let req = input(body(payload)?)?;
    Ok(Json(ops::auth::login(&state.services, req).await?))
}
