/// Project endpoints
///
/// - `GET /v1/teams/:team_id/projects` - Projects of a team
/// - `POST /v1/teams/:team_id/projects` - Create a project (`{name}`)

use super::{body, input, path_only, with_path};
use crate::{
    app::{Actor, AppState},
    error::ApiResult,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::Value;
use taskgate_shared::{models::project::Project, ops};

pub async fn list_projects(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(team_id): Path<String>,
) -> ApiResult<Json<Vec<Project>>> {
    let req = input(path_only(&[("teamId", team_id.as_str())]))?;
    Ok(Json(ops::projects::list_projects(&state.services, actor.user(), req).await?))
}

pub async fn create_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(team_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Project>> {
    let req = input(with_path(body(payload)?, &[("teamId", team_id.as_str())]))?;
    Ok(Json(ops::projects::create_project(&state.services, actor.user(), req).await?))
}
