/// Project model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL UNIQUE,
///     team_id UUID NOT NULL REFERENCES teams(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::Id;

/// Project owned by a team
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Id,

    /// Unique project name
    pub name: String,

    /// Owning team; immutable
    #[sqlx(rename = "team_id")]
    pub team: Id,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub team: Id,
}

const PROJECT_COLUMNS: &str = "id, name, team_id, created_at, updated_at";

impl Project {
    /// Creates a project
    ///
    /// # Errors
    ///
    /// Returns a unique violation if the name is taken
    pub async fn create(pool: &PgPool, data: NewProject) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects (name, team_id) VALUES ($1, $2) RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(data.name)
        .bind(data.team)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Id) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    /// Lists the projects of a team, oldest first
    pub async fn list_by_team(pool: &PgPool, team_id: Id) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE team_id = $1 ORDER BY created_at ASC"
        ))
        .bind(team_id)
        .fetch_all(pool)
        .await
    }
}
