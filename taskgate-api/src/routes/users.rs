/// User endpoints
///
/// - `GET /v1/me` - The caller, or `null` when anonymous
/// - `GET /v1/users` - All users (ADMIN)
/// - `PATCH /v1/users/:user_id` - Change name and/or role (ADMIN)

use super::{body, input, with_path};
use crate::{
    app::{Actor, AppState},
    error::ApiResult,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::Value;
use taskgate_shared::{models::user::User, ops};

pub async fn me(Extension(actor): Extension<Actor>) -> Json<Option<User>> {
    Json(ops::auth::me(actor.user()))
}

pub async fn list_users(State(state): State<AppState>, Extension(actor): Extension<Actor>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(ops::users::list_users(&state.services, actor.user()).await?))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let req = input(with_path(body(payload)?, &[("userId", user_id.as_str())]))?;
    Ok(Json(ops::users::update_user(&state.services, actor.user(), req).await?))
}
