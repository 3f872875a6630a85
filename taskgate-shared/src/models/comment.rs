/// Comment model and database operations
///
/// Comments are immutable once written and are removed only when their task
/// is deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     text TEXT NOT NULL,
///     author_id UUID NOT NULL REFERENCES users(id),
///     task_id UUID NOT NULL REFERENCES tasks(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::Id;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Id,
    pub text: String,

    #[sqlx(rename = "author_id")]
    pub author: Id,

    #[sqlx(rename = "task_id")]
    pub task: Id,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: String,
    pub author: Id,
    pub task: Id,
}

const COMMENT_COLUMNS: &str = "id, text, author_id, task_id, created_at, updated_at";

impl Comment {
    pub async fn create(pool: &PgPool, data: NewComment) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comments (text, author_id, task_id) VALUES ($1, $2, $3) RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(data.text)
        .bind(data.author)
        .bind(data.task)
        .fetch_one(pool)
        .await
    }

    /// Lists a task's comments in the order they were written
    pub async fn list_by_task(pool: &PgPool, task_id: Id) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE task_id = $1 ORDER BY created_at ASC"
        ))
        .bind(task_id)
        .fetch_all(pool)
        .await
    }

    pub async fn count_by_task(pool: &PgPool, task_id: Id) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE task_id = $1")
            .bind(task_id)
            .fetch_one(pool)
            .await
    }

    /// Deletes every comment of a task, returning how many were removed
    pub async fn delete_by_task(pool: &PgPool, task_id: Id) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE task_id = $1")
            .bind(task_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
