/// Team model and database operations
///
/// A team is the unit of authorization scope: project and task access is
/// always decided by membership in the owning team.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL UNIQUE,
///     created_by UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE team_members (
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     added_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     position BIGSERIAL NOT NULL,
///     PRIMARY KEY (team_id, user_id)
/// );
/// ```
///
/// The composite primary key makes membership a set: adding an existing
/// member is a no-op (`ON CONFLICT DO NOTHING`). Members are listed by
/// `position`, so the creator inserted first stays first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::Id;

/// Team with its member set
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Id,

    /// Unique team name
    pub name: String,

    /// Member user IDs, in the order they joined
    pub members: Vec<Id>,

    /// Creator; immutable after creation
    pub created_by: Id,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Checks membership against the loaded member set
    pub fn has_member(&self, user_id: Id) -> bool {
        self.members.contains(&user_id)
    }
}

/// Input for creating a team
///
/// `members` must already contain the creator.
#[derive(Debug, Clone)]
pub struct NewTeam {
    pub name: String,
    pub members: Vec<Id>,
    pub created_by: Id,
}

const TEAM_SELECT: &str = r#"
    SELECT t.id, t.name, t.created_by, t.created_at, t.updated_at,
           COALESCE(
               array_agg(m.user_id ORDER BY m.position) FILTER (WHERE m.user_id IS NOT NULL),
               '{}'
           ) AS members
    FROM teams t
    LEFT JOIN team_members m ON m.team_id = t.id
"#;

impl Team {
    /// Creates a team and its initial memberships in one transaction
    ///
    /// # Errors
    ///
    /// Returns a unique violation if the name is taken
    pub async fn create(pool: &PgPool, data: NewTeam) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (id,): (Id,) = sqlx::query_as(
            "INSERT INTO teams (name, created_by) VALUES ($1, $2) RETURNING id",
        )
        .bind(&data.name)
        .bind(data.created_by)
        .fetch_one(&mut *tx)
        .await?;

        for user_id in &data.members {
            sqlx::query(
                r#"
                INSERT INTO team_members (team_id, user_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Finds a team by ID
    pub async fn find_by_id(pool: &PgPool, id: Id) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Team>(&format!("{TEAM_SELECT} WHERE t.id = $1 GROUP BY t.id"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a team by its unique name
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Team>(&format!("{TEAM_SELECT} WHERE t.name = $1 GROUP BY t.id"))
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Lists every team, oldest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Team>(&format!(
            "{TEAM_SELECT} GROUP BY t.id ORDER BY t.created_at ASC"
        ))
        .fetch_all(pool)
        .await
    }

    /// Lists the teams a user belongs to
    pub async fn list_by_member(pool: &PgPool, user_id: Id) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Team>(&format!(
            r#"{TEAM_SELECT}
            WHERE t.id IN (SELECT team_id FROM team_members WHERE user_id = $1)
            GROUP BY t.id
            ORDER BY t.created_at ASC"#
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Checks whether a user is a member of a team
    ///
    /// A missing team yields `false`.
    pub async fn has_member_in_db(pool: &PgPool, team_id: Id, user_id: Id) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM team_members
                WHERE team_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Adds a member; adding an existing member changes nothing
    ///
    /// Returns `None` when the team does not exist.
    pub async fn add_member(pool: &PgPool, team_id: Id, user_id: Id) -> Result<Option<Self>, sqlx::Error> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO team_members (team_id, user_id)
            SELECT id, $2 FROM teams WHERE id = $1
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        if inserted.rows_affected() > 0 {
            Self::touch(pool, team_id).await?;
        }

        Self::find_by_id(pool, team_id).await
    }

    /// Removes a member and unassigns them from the team's tasks
    ///
    /// Both writes share one transaction. Returns `None` when the team does
    /// not exist.
    pub async fn remove_member(pool: &PgPool, team_id: Id, user_id: Id) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removed = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if removed.rows_affected() > 0 {
            sqlx::query(
                r#"
                UPDATE tasks SET assignee_id = NULL, updated_at = NOW()
                WHERE assignee_id = $2
                  AND project_id IN (SELECT id FROM projects WHERE team_id = $1)
                "#,
            )
            .bind(team_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

            sqlx::query("UPDATE teams SET updated_at = NOW() WHERE id = $1")
                .bind(team_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Self::find_by_id(pool, team_id).await
    }

    async fn touch(pool: &PgPool, team_id: Id) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE teams SET updated_at = NOW() WHERE id = $1")
            .bind(team_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
