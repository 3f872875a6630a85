/// Tasks
///
/// Reads go through team membership: a task is visible to an admin or to a
/// member of its project's team. Listings add a row filter so that
/// non-admins only see tasks assigned to themselves.
///
/// # Assignee rule
///
/// An assignee must be a member of the project's owning team. Every write
/// that sets an assignee checks this before touching the task.

use std::collections::HashSet;

use serde::Serialize;
use tracing::info;

use super::Services;
use crate::auth::permissions::{authorize, has_project_access, has_task_access, is_admin, Operation};
use crate::error::{DomainError, DomainResult};
use crate::models::{
    task::{NewTask, Task, TaskFilter, TaskPatch},
    user::User,
    Id,
};
use crate::store::Store;
use crate::validation::inputs::{
    AssignTaskInput, CreateTaskInput, GenericIdInput, ProjectIdInput, TaskListQuery, UpdateTaskInput,
};

const TASK_NOT_FOUND: &str = "Task not found";
const NO_TASK_ACCESS: &str = "You do not have access to this task";
const ASSIGNEE_NOT_MEMBER: &str = "Assignee must be a team member";

/// One page of a task listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPage<T = Task> {
    pub items: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> TaskPage<T> {
    /// Replaces the items, keeping the paging figures
    pub fn map_items<U>(self, items: Vec<U>) -> TaskPage<U> {
        TaskPage {
            items,
            page: self.page,
            limit: self.limit,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Number of pages needed for `total` items at `limit` per page
pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        0
    } else {
        total.div_ceil(limit)
    }
}

/// Fails with `BadRequest` unless `assignee` belongs to the team owning `project_id`
async fn check_assignee(store: &dyn Store, project_id: Id, assignee: Id) -> DomainResult<()> {
    let project = store
        .find_project(project_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Project not found"))?;

    if !store.is_team_member(project.team, assignee).await? {
        return Err(DomainError::bad_request(ASSIGNEE_NOT_MEMBER));
    }

    Ok(())
}

/// Loads a task for a mutation: `NotFound` first, then `Forbidden`
async fn writable_task(store: &dyn Store, actor: &User, task_id: Id) -> DomainResult<Task> {
    let task = store
        .find_task(task_id)
        .await?
        .ok_or_else(|| DomainError::not_found(TASK_NOT_FOUND))?;

    if !has_task_access(store, actor, task.id).await? {
        return Err(DomainError::forbidden(NO_TASK_ACCESS));
    }

    Ok(task)
}

/// Lists a project's tasks, newest first
pub async fn list_tasks(services: &Services, actor: Option<&User>, query: TaskListQuery) -> DomainResult<TaskPage> {
    let actor = authorize(actor, Operation::Tasks)?;
    let store = services.store();

    if !has_project_access(store, actor, query.project_id).await? {
        return Err(DomainError::forbidden("You do not have access to this project"));
    }

    let filter = TaskFilter {
        project: Some(query.project_id),
        assignee: (!is_admin(actor)).then_some(actor.id),
        status: query.status,
    };

    let offset = query.page.saturating_sub(1).saturating_mul(query.limit);
    let items = store.list_tasks(filter, offset, query.limit).await?;
    let total_items = store.count_tasks(filter).await?;

    Ok(TaskPage {
        items,
        page: query.page,
        limit: query.limit,
        total_items,
        total_pages: total_pages(total_items, query.limit),
    })
}

/// Fetches one task
///
/// A task the actor cannot see is reported as missing.
pub async fn get_task(services: &Services, actor: Option<&User>, input: GenericIdInput) -> DomainResult<Task> {
    let actor = authorize(actor, Operation::Task)?;
    let store = services.store();

    if !has_task_access(store, actor, input.id).await? {
        return Err(DomainError::not_found(TASK_NOT_FOUND));
    }

    store
        .find_task(input.id)
        .await?
        .ok_or_else(|| DomainError::not_found(TASK_NOT_FOUND))
}

/// Every task assigned to the actor, newest first
///
/// Like any other task read, a non-admin only sees tasks of projects owned by
/// a team they currently belong to.
pub async fn my_tasks(services: &Services, actor: Option<&User>) -> DomainResult<Vec<Task>> {
    let actor = authorize(actor, Operation::MyTasks)?;
    let store = services.store();

    let filter = TaskFilter {
        assignee: Some(actor.id),
        ..Default::default()
    };
    let total = store.count_tasks(filter).await?;
    let tasks = store.list_tasks(filter, 0, total).await?;

    if is_admin(actor) {
        return Ok(tasks);
    }

    let mut visible: HashSet<Id> = HashSet::new();
    for team in store.list_teams_by_member(actor.id).await? {
        let projects = store.list_projects_by_team(team.id).await?;
        visible.extend(projects.into_iter().map(|p| p.id));
    }

    Ok(tasks.into_iter().filter(|t| visible.contains(&t.project)).collect())
}

/// Creates a task in a project
pub async fn create_task(
    services: &Services,
    actor: Option<&User>,
    project: ProjectIdInput,
    input: CreateTaskInput,
) -> DomainResult<Task> {
    let actor = authorize(actor, Operation::CreateTask)?;
    let store = services.store();

    if !has_project_access(store, actor, project.project_id).await? {
        return Err(DomainError::forbidden("You do not have access to this project"));
    }

    if let Some(assignee) = input.assignee_id {
        check_assignee(store, project.project_id, assignee).await?;
    }

    let task = store
        .create_task(NewTask {
            title: input.title,
            description: input.description,
            status: input.status.unwrap_or_default(),
            due_date: input.due_date,
            project: project.project_id,
            assignee: input.assignee_id,
            created_by: actor.id,
        })
        .await?;

    info!(task_id = %task.id, project_id = %task.project, actor_id = %actor.id, "Task created");
    Ok(task)
}

/// Sets a task's assignee
pub async fn assign_task(services: &Services, actor: Option<&User>, input: AssignTaskInput) -> DomainResult<Task> {
    let actor = authorize(actor, Operation::AssignTask)?;
    let store = services.store();

    let task = writable_task(store, actor, input.task_id).await?;
    check_assignee(store, task.project, input.user_id).await?;

    let patch = TaskPatch {
        assignee: Some(Some(input.user_id)),
        ..Default::default()
    };
    let task = store
        .update_task(task.id, patch)
        .await?
        .ok_or_else(|| DomainError::not_found(TASK_NOT_FOUND))?;

    info!(task_id = %task.id, assignee_id = %input.user_id, actor_id = %actor.id, "Task assigned");
    Ok(task)
}

/// Applies a partial update to a task
///
/// Absent fields stay unchanged; `null` clears nullable fields.
pub async fn update_task(
    services: &Services,
    actor: Option<&User>,
    target: GenericIdInput,
    input: UpdateTaskInput,
) -> DomainResult<Task> {
    let actor = authorize(actor, Operation::UpdateTask)?;
    let store = services.store();

    let task = writable_task(store, actor, target.id).await?;

    if let Some(Some(assignee)) = input.assignee_id {
        check_assignee(store, task.project, assignee).await?;
    }

    let patch = TaskPatch {
        title: input.title,
        description: input.description,
        status: input.status,
        assignee: input.assignee_id,
        due_date: input.due_date,
    };
    let task = store
        .update_task(task.id, patch)
        .await?
        .ok_or_else(|| DomainError::not_found(TASK_NOT_FOUND))?;

    info!(task_id = %task.id, actor_id = %actor.id, status = %task.status.as_str(), "Task updated");
    Ok(task)
}

/// Deletes a task and all of its comments
pub async fn delete_task(services: &Services, actor: Option<&User>, input: GenericIdInput) -> DomainResult<bool> {
    let actor = authorize(actor, Operation::DeleteTask)?;
    let store = services.store();

    let task = writable_task(store, actor, input.id).await?;

    let comments = store.delete_comments_by_task(task.id).await?;
    store.delete_task(task.id).await?;

    info!(task_id = %task.id, comments, actor_id = %actor.id, "Task deleted");
    Ok(true)
}
