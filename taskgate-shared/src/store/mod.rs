/// Entity store abstraction
///
/// Every domain operation and permission predicate reads and writes state
/// through the [`Store`] trait. The trait is the typed equivalent of a
/// document repository: find by id, find one/many by filter, create, update
/// by id, delete by id, delete many, exists and count.
///
/// # Backends
///
/// - [`postgres::PgStore`]: PostgreSQL via sqlx (production)
/// - [`memory::MemoryStore`]: in-process tables behind a `tokio` lock
///   (development and tests)
///
/// # Atomicity
///
/// Each method is atomic on its own. Sequences of calls are not wrapped in a
/// transaction; membership adds are idempotent at the store level so two
/// racing adds cannot duplicate a member.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskgate_shared::store::{memory::MemoryStore, Store};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
/// let users = store.list_users().await?;
/// assert!(users.is_empty());
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::{
    comment::{Comment, NewComment},
    project::{NewProject, Project},
    task::{NewTask, Task, TaskFilter, TaskPatch},
    team::{NewTeam, Team},
    user::{NewUser, User, UserPatch},
    Id,
};

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint was violated (email, team name, project name)
    #[error("Duplicate value violates unique constraint: {0}")]
    Duplicate(String),

    /// A referenced parent record does not exist
    #[error("Referenced record does not exist: {0}")]
    MissingReference(String),

    /// Backend failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            if db_err.is_unique_violation() {
                return StoreError::Duplicate(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::MissingReference(constraint);
            }
        }
        StoreError::Database(err)
    }
}

/// Persistent collections for users, teams, projects, tasks and comments
#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Verifies the backend is reachable
    async fn health_check(&self) -> StoreResult<()>;

    /// Releases backend resources; called once on shutdown
    async fn close(&self);

    // Users

    async fn find_user(&self, id: Id) -> StoreResult<Option<User>>;

    /// Looks up a user by normalized (trimmed, lower-cased) email
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn list_users_by_ids(&self, ids: &[Id]) -> StoreResult<Vec<User>>;

    /// Fails with [`StoreError::Duplicate`] if the email is taken
    async fn create_user(&self, data: NewUser) -> StoreResult<User>;

    async fn update_user(&self, id: Id, patch: UserPatch) -> StoreResult<Option<User>>;

    // Teams

    async fn find_team(&self, id: Id) -> StoreResult<Option<Team>>;

    async fn find_team_by_name(&self, name: &str) -> StoreResult<Option<Team>>;

    async fn list_teams(&self) -> StoreResult<Vec<Team>>;

    async fn list_teams_by_member(&self, user_id: Id) -> StoreResult<Vec<Team>>;

    /// Existence check: the team exists and lists `user_id` as a member
    async fn is_team_member(&self, team_id: Id, user_id: Id) -> StoreResult<bool>;

    /// Fails with [`StoreError::Duplicate`] if the name is taken
    async fn create_team(&self, data: NewTeam) -> StoreResult<Team>;

    /// Adds a member if absent; `None` if the team does not exist
    async fn add_team_member(&self, team_id: Id, user_id: Id) -> StoreResult<Option<Team>>;

    /// Removes a member if present and clears their assignments on the
    /// team's tasks; `None` if the team does not exist
    async fn remove_team_member(&self, team_id: Id, user_id: Id) -> StoreResult<Option<Team>>;

    // Projects

    async fn find_project(&self, id: Id) -> StoreResult<Option<Project>>;

    async fn find_project_by_name(&self, name: &str) -> StoreResult<Option<Project>>;

    async fn list_projects_by_team(&self, team_id: Id) -> StoreResult<Vec<Project>>;

    /// Fails with [`StoreError::Duplicate`] if the name is taken
    async fn create_project(&self, data: NewProject) -> StoreResult<Project>;

    // Tasks

    async fn find_task(&self, id: Id) -> StoreResult<Option<Task>>;

    /// Lists matching tasks newest first, skipping `offset` rows
    async fn list_tasks(&self, filter: TaskFilter, offset: u64, limit: u64) -> StoreResult<Vec<Task>>;

    async fn count_tasks(&self, filter: TaskFilter) -> StoreResult<u64>;

    async fn create_task(&self, data: NewTask) -> StoreResult<Task>;

    async fn update_task(&self, id: Id, patch: TaskPatch) -> StoreResult<Option<Task>>;

    /// Deletes the task row only; returns whether it existed
    async fn delete_task(&self, id: Id) -> StoreResult<bool>;

    // Comments

    async fn list_comments_by_task(&self, task_id: Id) -> StoreResult<Vec<Comment>>;

    async fn count_comments_by_task(&self, task_id: Id) -> StoreResult<u64>;

    async fn create_comment(&self, data: NewComment) -> StoreResult<Comment>;

    /// Deletes every comment of a task; returns how many were removed
    async fn delete_comments_by_task(&self, task_id: Id) -> StoreResult<u64>;
}
