/// Task and comment endpoints
///
/// - `GET /v1/projects/:project_id/tasks?page&limit&status` - Paginated listing
/// - `POST /v1/projects/:project_id/tasks` - Create a task
/// - `GET /v1/tasks/mine` - Tasks assigned to the caller
/// - `GET /v1/tasks/:task_id` - One task with its comments
/// - `PATCH /v1/tasks/:task_id` - Partial update
/// - `DELETE /v1/tasks/:task_id` - Delete a task and its comments
/// - `POST /v1/tasks/:task_id/assign` - Set the assignee (`{userId}`)
/// - `POST /v1/tasks/:task_id/comments` - Add a comment (`{text}`)
///
/// Task responses embed `assignee` and `project.team`; the single-task read
/// also embeds `comments` with their authors. Comment responses embed
/// `author` and `task`.
///
/// # Listing Response
///
/// ```json
/// {
///   "items": [{ "id": "uuid", "title": "Ship", "assignee": { ... }, "project": { "team": { ... } } }],
///   "page": 1,
///   "limit": 30,
///   "totalItems": 1,
///   "totalPages": 1
/// }
/// ```

use std::collections::HashMap;

use super::{body, input, path_only, with_path};
use crate::{
    app::{Actor, AppState},
    error::ApiResult,
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use serde_json::{Map, Value};
use taskgate_shared::{
    ops::{self, tasks::TaskPage},
    relations::{populate, populate_all, Node, COMMENT_POPULATE, TASK_DETAIL_POPULATE, TASK_POPULATE},
};

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(project_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<TaskPage<Value>>> {
    let raw: Map<String, Value> = params.into_iter().map(|(k, v)| (k, Value::String(v))).collect();
    let query = input(with_path(Value::Object(raw), &[("projectId", project_id.as_str())]))?;

    let mut page = ops::tasks::list_tasks(&state.services, actor.user(), query).await?;
    let items = std::mem::take(&mut page.items);
    let items = populate_all(state.services.store(), items, Node::Task, TASK_POPULATE).await?;

    Ok(Json(page.map_items(items)))
}

pub async fn my_tasks(State(state): State<AppState>, Extension(actor): Extension<Actor>) -> ApiResult<Json<Vec<Value>>> {
    let tasks = ops::tasks::my_tasks(&state.services, actor.user()).await?;
    Ok(Json(populate_all(state.services.store(), tasks, Node::Task, TASK_POPULATE).await?))
}

pub async fn get_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let req = input(path_only(&[("id", task_id.as_str())]))?;
    let task = ops::tasks::get_task(&state.services, actor.user(), req).await?;

    Ok(Json(populate(state.services.store(), Node::Task(task), TASK_DETAIL_POPULATE).await?))
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(project_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let project = input(path_only(&[("projectId", project_id.as_str())]))?;
    let req = input(body(payload)?)?;
    let task = ops::tasks::create_task(&state.services, actor.user(), project, req).await?;

    Ok(Json(populate(state.services.store(), Node::Task(task), TASK_POPULATE).await?))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(task_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let target = input(path_only(&[("id", task_id.as_str())]))?;
    let req = input(body(payload)?)?;
    let task = ops::tasks::update_task(&state.services, actor.user(), target, req).await?;

    Ok(Json(populate(state.services.store(), Node::Task(task), TASK_POPULATE).await?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<bool>> {
    let req = input(path_only(&[("id", task_id.as_str())]))?;
    Ok(Json(ops::tasks::delete_task(&state.services, actor.user(), req).await?))
}

pub async fn assign_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(task_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let req = input(with_path(body(payload)?, &[("taskId", task_id.as_str())]))?;
    let task = ops::tasks::assign_task(&state.services, actor.user(), req).await?;

    Ok(Json(populate(state.services.store(), Node::Task(task), TASK_POPULATE).await?))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(task_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let req = input(with_path(body(payload)?, &[("taskId", task_id.as_str())]))?;
    let comment = ops::comments::add_comment(&state.services, actor.user(), req).await?;

    Ok(Json(populate(state.services.store(), Node::Comment(comment), COMMENT_POPULATE).await?))
}
