/// Task model and database operations
///
/// Tasks live under a project. Their assignee, if any, must belong to the
/// project's owning team; that rule is enforced by the domain operations,
/// not by the schema.
///
/// # Status
///
/// ```text
/// TODO → IN_PROGRESS → DONE
/// ```
///
/// Any status may be set directly by an authorized update; there is no
/// enforced transition order.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('TODO', 'IN_PROGRESS', 'DONE');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'TODO',
///     due_date TIMESTAMPTZ,
///     project_id UUID NOT NULL REFERENCES projects(id),
///     assignee_id UUID REFERENCES users(id),
///     created_by UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE INDEX idx_tasks_project_created ON tasks (project_id, created_at DESC);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::Id;

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Wire names accepted by input validation
    pub const NAMES: &'static [&'static str] = &["TODO", "IN_PROGRESS", "DONE"];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

/// Task owned by a project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Id,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,

    /// Owning project; immutable
    #[sqlx(rename = "project_id")]
    pub project: Id,

    /// Assigned user, always a member of the project's team
    #[sqlx(rename = "assignee_id")]
    pub assignee: Option<Id>,

    /// Creator; immutable
    pub created_by: Id,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub project: Id,
    pub assignee: Option<Id>,
    pub created_by: Id,
}

/// Partial update of a task
///
/// Outer `None` leaves a field unchanged. For nullable fields,
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub assignee: Option<Option<Id>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Row filter for task listings; `None` fields match everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub project: Option<Id>,
    pub assignee: Option<Id>,
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    /// Evaluates the filter against a loaded task
    pub fn matches(&self, task: &Task) -> bool {
        self.project.map_or(true, |p| task.project == p)
            && self.assignee.map_or(true, |a| task.assignee == Some(a))
            && self.status.map_or(true, |s| task.status == s)
    }
}

const TASK_COLUMNS: &str = "id, title, description, status, due_date, project_id, assignee_id, \
                            created_by, created_at, updated_at";

const TASK_FILTER: &str = r#"
    ($1::uuid IS NULL OR project_id = $1)
    AND ($2::uuid IS NULL OR assignee_id = $2)
    AND ($3::task_status IS NULL OR status = $3)
"#;

impl Task {
    pub async fn create(pool: &PgPool, data: NewTask) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (title, description, status, due_date, project_id, assignee_id, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.due_date)
        .bind(data.project)
        .bind(data.assignee)
        .bind(data.created_by)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Id) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists tasks matching `filter`, newest first
    pub async fn list(
        pool: &PgPool,
        filter: TaskFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS} FROM tasks
            WHERE {TASK_FILTER}
            ORDER BY created_at DESC, id DESC
            OFFSET $4 LIMIT $5
            "#
        ))
        .bind(filter.project)
        .bind(filter.assignee)
        .bind(filter.status)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Counts tasks matching `filter`
    pub async fn count(pool: &PgPool, filter: TaskFilter) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM tasks WHERE {TASK_FILTER}"))
            .bind(filter.project)
            .bind(filter.assignee)
            .bind(filter.status)
            .fetch_one(pool)
            .await
    }

    /// Applies a partial update
    ///
    /// Returns `None` when no task has the given ID.
    pub async fn update(pool: &PgPool, id: Id, patch: TaskPatch) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                status = COALESCE($5, status),
                assignee_id = CASE WHEN $6 THEN $7 ELSE assignee_id END,
                due_date = CASE WHEN $8 THEN $9 ELSE due_date END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.description.is_some())
        .bind(patch.description.flatten())
        .bind(patch.status)
        .bind(patch.assignee.is_some())
        .bind(patch.assignee.flatten())
        .bind(patch.due_date.is_some())
        .bind(patch.due_date.flatten())
        .fetch_optional(pool)
        .await
    }

    /// Deletes a task row
    ///
    /// Comments must be removed first; see
    /// [`Comment::delete_by_task`](super::comment::Comment::delete_by_task).
    pub async fn delete(pool: &PgPool, id: Id) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
