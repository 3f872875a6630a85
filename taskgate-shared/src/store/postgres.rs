/// PostgreSQL store backend
///
/// Thin adapter from the [`Store`] trait to the model-level sqlx queries in
/// [`crate::models`]. Constraint violations are translated into
/// [`StoreError`] variants by `From<sqlx::Error>`.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{Store, StoreResult};
use crate::db::pool;
use crate::models::{
    comment::{Comment, NewComment},
    project::{NewProject, Project},
    task::{NewTask, Task, TaskFilter, TaskPatch},
    team::{NewTeam, Team},
    user::{NewUser, User, UserPatch},
    Id,
};

/// Store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an initialized pool (see [`pool::create_pool`])
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for migrations and diagnostics
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> StoreResult<()> {
        pool::health_check(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        pool::close_pool(&self.pool).await;
    }

    async fn find_user(&self, id: Id) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(User::list_all(&self.pool).await?)
    }

    async fn list_users_by_ids(&self, ids: &[Id]) -> StoreResult<Vec<User>> {
        Ok(User::list_by_ids(&self.pool, ids).await?)
    }

    async fn create_user(&self, data: NewUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn update_user(&self, id: Id, patch: UserPatch) -> StoreResult<Option<User>> {
        Ok(User::update(&self.pool, id, patch).await?)
    }

    async fn find_team(&self, id: Id) -> StoreResult<Option<Team>> {
        Ok(Team::find_by_id(&self.pool, id).await?)
    }

    async fn find_team_by_name(&self, name: &str) -> StoreResult<Option<Team>> {
        Ok(Team::find_by_name(&self.pool, name).await?)
    }

    async fn list_teams(&self) -> StoreResult<Vec<Team>> {
        Ok(Team::list_all(&self.pool).await?)
    }

    async fn list_teams_by_member(&self, user_id: Id) -> StoreResult<Vec<Team>> {
        Ok(Team::list_by_member(&self.pool, user_id).await?)
    }

    async fn is_team_member(&self, team_id: Id, user_id: Id) -> StoreResult<bool> {
        Ok(Team::has_member_in_db(&self.pool, team_id, user_id).await?)
    }

    async fn create_team(&self, data: NewTeam) -> StoreResult<Team> {
        Ok(Team::create(&self.pool, data).await?)
    }

    async fn add_team_member(&self, team_id: Id, user_id: Id) -> StoreResult<Option<Team>> {
        Ok(Team::add_member(&self.pool, team_id, user_id).await?)
    }

    async fn remove_team_member(&self, team_id: Id, user_id: Id) -> StoreResult<Option<Team>> {
        Ok(Team::remove_member(&self.pool, team_id, user_id).await?)
    }

    async fn find_project(&self, id: Id) -> StoreResult<Option<Project>> {
        Ok(Project::find_by_id(&self.pool, id).await?)
    }

    async fn find_project_by_name(&self, name: &str) -> StoreResult<Option<Project>> {
        Ok(Project::find_by_name(&self.pool, name).await?)
    }

    async fn list_projects_by_team(&self, team_id: Id) -> StoreResult<Vec<Project>> {
        Ok(Project::list_by_team(&self.pool, team_id).await?)
    }

    async fn create_project(&self, data: NewProject) -> StoreResult<Project> {
        Ok(Project::create(&self.pool, data).await?)
    }

    async fn find_task(&self, id: Id) -> StoreResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn list_tasks(&self, filter: TaskFilter, offset: u64, limit: u64) -> StoreResult<Vec<Task>> {
        Ok(Task::list(&self.pool, filter, to_i64(offset), to_i64(limit)).await?)
    }

    async fn count_tasks(&self, filter: TaskFilter) -> StoreResult<u64> {
        let count = Task::count(&self.pool, filter).await?;
        Ok(count.max(0) as u64)
    }

    async fn create_task(&self, data: NewTask) -> StoreResult<Task> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn update_task(&self, id: Id, patch: TaskPatch) -> StoreResult<Option<Task>> {
        Ok(Task::update(&self.pool, id, patch).await?)
    }

    async fn delete_task(&self, id: Id) -> StoreResult<bool> {
        Ok(Task::delete(&self.pool, id).await?)
    }

    async fn list_comments_by_task(&self, task_id: Id) -> StoreResult<Vec<Comment>> {
        Ok(Comment::list_by_task(&self.pool, task_id).await?)
    }

    async fn count_comments_by_task(&self, task_id: Id) -> StoreResult<u64> {
        let count = Comment::count_by_task(&self.pool, task_id).await?;
        Ok(count.max(0) as u64)
    }

    async fn create_comment(&self, data: NewComment) -> StoreResult<Comment> {
        Ok(Comment::create(&self.pool, data).await?)
    }

    async fn delete_comments_by_task(&self, task_id: Id) -> StoreResult<u64> {
        Ok(Comment::delete_by_task(&self.pool, task_id).await?)
    }
}
