/// Team endpoints
///
/// - `GET /v1/teams` - Teams visible to the caller
/// - `POST /v1/teams` - Create a team (`{name, members?}`)
/// - `POST /v1/teams/:team_id/members` - Add a member (`{userId}`)
/// - `DELETE /v1/teams/:team_id/members/:user_id` - Remove a member
///
/// The team returned by a removal embeds its remaining members.

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
use taskgate_shared::{
    models::team::Team,
    ops,
    relations::{populate, Node, TEAM_POPULATE},
};

pub async fn list_teams(State(state): State<AppState>, Extension(actor): Extension<Actor>) -> ApiResult<Json<Vec<Team>>> {
    Ok(Json(ops::teams::list_teams(&state.services, actor.user()).await?))
}

pub async fn create_team(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Team>> {
    let req = input(body(payload)?)?;
    Ok(Json(ops::teams::create_team(&state.services, actor.user(), req).await?))
}

pub async fn add_member(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(team_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Team>> {
    let req = input(with_path(body(payload)?, &[("teamId", team_id.as_str())]))?;
    Ok(Json(ops::teams::add_user_to_team(&state.services, actor.user(), req).await?))
}

pub async fn remove_member(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((team_id, user_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let req = input(path_only(&[("teamId", team_id.as_str()), ("userId", user_id.as_str())]))?;
    let team = ops::teams::remove_user_from_team(&state.services, actor.user(), req).await?;

    Ok(Json(populate(state.services.store(), Node::Team(team), TEAM_POPULATE).await?))
}
