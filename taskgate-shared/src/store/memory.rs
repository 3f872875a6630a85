/// In-memory store backend
///
/// Keeps every collection in insertion-ordered vectors behind a single
/// `tokio::sync::RwLock`. Each trait method takes the lock once, so every
/// method is atomic with respect to the others. Unique constraints and
/// reference checks mirror the PostgreSQL schema.
///
/// Used by the test suites and by `STORE_BACKEND=memory` for local runs.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Store, StoreError, StoreResult};
use crate::models::{
    comment::{Comment, NewComment},
    project::{NewProject, Project},
    task::{NewTask, Task, TaskFilter, TaskPatch},
    team::{NewTeam, Team},
    user::{NewUser, User, UserPatch},
    Id,
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    teams: Vec<Team>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    comments: Vec<Comment>,
}

impl Tables {
    fn user_exists(&self, id: Id) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    fn team_mut(&mut self, id: Id) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == id)
    }

    fn require_user(&self, id: Id, constraint: &str) -> StoreResult<()> {
        if self.user_exists(id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference(constraint.to_string()))
        }
    }
}

/// Store holding all state in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) {}

    async fn find_user(&self, id: Id) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn list_users_by_ids(&self, ids: &[Id]) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn create_user(&self, data: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email.eq_ignore_ascii_case(&data.email)) {
            return Err(StoreError::Duplicate("users_email_key".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Id::new_v4(),
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: Id, patch: UserPatch) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn find_team(&self, id: Id) -> StoreResult<Option<Team>> {
        let tables = self.tables.read().await;
        Ok(tables.teams.iter().find(|t| t.id == id).cloned())
    }

    async fn find_team_by_name(&self, name: &str) -> StoreResult<Option<Team>> {
        let tables = self.tables.read().await;
        Ok(tables.teams.iter().find(|t| t.name == name).cloned())
    }

    async fn list_teams(&self) -> StoreResult<Vec<Team>> {
        Ok(self.tables.read().await.teams.clone())
    }

    async fn list_teams_by_member(&self, user_id: Id) -> StoreResult<Vec<Team>> {
        let tables = self.tables.read().await;
        Ok(tables
            .teams
            .iter()
            .filter(|t| t.has_member(user_id))
            .cloned()
            .collect())
    }

    async fn is_team_member(&self, team_id: Id, user_id: Id) -> StoreResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .teams
            .iter()
            .any(|t| t.id == team_id && t.has_member(user_id)))
    }

    async fn create_team(&self, data: NewTeam) -> StoreResult<Team> {
        let mut tables = self.tables.write().await;
        if tables.teams.iter().any(|t| t.name == data.name) {
            return Err(StoreError::Duplicate("teams_name_key".to_string()));
        }
        tables.require_user(data.created_by, "teams_created_by_fkey")?;

        let mut members: Vec<Id> = Vec::with_capacity(data.members.len());
        for user_id in data.members {
            tables.require_user(user_id, "team_members_user_id_fkey")?;
            if !members.contains(&user_id) {
                members.push(user_id);
            }
        }

        let now = Utc::now();
        let team = Team {
            id: Id::new_v4(),
            name: data.name,
            members,
            created_by: data.created_by,
            created_at: now,
            updated_at: now,
        };
        tables.teams.push(team.clone());
        Ok(team)
    }

    async fn add_team_member(&self, team_id: Id, user_id: Id) -> StoreResult<Option<Team>> {
        let mut tables = self.tables.write().await;
        if !tables.teams.iter().any(|t| t.id == team_id) {
            return Ok(None);
        }
        tables.require_user(user_id, "team_members_user_id_fkey")?;

        let Some(team) = tables.team_mut(team_id) else {
            return Ok(None);
        };
        if !team.has_member(user_id) {
            team.members.push(user_id);
            team.updated_at = Utc::now();
        }
        Ok(Some(team.clone()))
    }

    async fn remove_team_member(&self, team_id: Id, user_id: Id) -> StoreResult<Option<Team>> {
        let mut tables = self.tables.write().await;
        let Some(team) = tables.team_mut(team_id) else {
            return Ok(None);
        };

        let before = team.members.len();
        team.members.retain(|m| *m != user_id);
        if team.members.len() == before {
            return Ok(Some(team.clone()));
        }

        let now = Utc::now();
        team.updated_at = now;
        let team = team.clone();

        let Tables { projects, tasks, .. } = &mut *tables;
        for task in tasks.iter_mut() {
            let owned = projects.iter().any(|p| p.id == task.project && p.team == team_id);
            if owned && task.assignee == Some(user_id) {
                task.assignee = None;
                task.updated_at = now;
            }
        }

        Ok(Some(team))
    }

    async fn find_project(&self, id: Id) -> StoreResult<Option<Project>> {
        let tables = self.tables.read().await;
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn find_project_by_name(&self, name: &str) -> StoreResult<Option<Project>> {
        let tables = self.tables.read().await;
        Ok(tables.projects.iter().find(|p| p.name == name).cloned())
    }

    async fn list_projects_by_team(&self, team_id: Id) -> StoreResult<Vec<Project>> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .iter()
            .filter(|p| p.team == team_id)
            .cloned()
            .collect())
    }

    async fn create_project(&self, data: NewProject) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;
        if tables.projects.iter().any(|p| p.name == data.name) {
            return Err(StoreError::Duplicate("projects_name_key".to_string()));
        }
        if !tables.teams.iter().any(|t| t.id == data.team) {
            return Err(StoreError::MissingReference("projects_team_id_fkey".to_string()));
        }

        let now = Utc::now();
        let project = Project {
            id: Id::new_v4(),
            name: data.name,
            team: data.team,
            created_at: now,
            updated_at: now,
        };
        tables.projects.push(project.clone());
        Ok(project)
    }

    async fn find_task(&self, id: Id) -> StoreResult<Option<Task>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tasks(&self, filter: TaskFilter, offset: u64, limit: u64) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);

        // Insertion order reversed is creation order newest first
        Ok(tables
            .tasks
            .iter()
            .rev()
            .filter(|t| filter.matches(t))
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn count_tasks(&self, filter: TaskFilter) -> StoreResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.iter().filter(|t| filter.matches(t)).count() as u64)
    }

    async fn create_task(&self, data: NewTask) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;
        if !tables.projects.iter().any(|p| p.id == data.project) {
            return Err(StoreError::MissingReference("tasks_project_id_fkey".to_string()));
        }
        tables.require_user(data.created_by, "tasks_created_by_fkey")?;
        if let Some(assignee) = data.assignee {
            tables.require_user(assignee, "tasks_assignee_id_fkey")?;
        }

        let now = Utc::now();
        let task = Task {
            id: Id::new_v4(),
            title: data.title,
            description: data.description,
            status: data.status,
            due_date: data.due_date,
            project: data.project,
            assignee: data.assignee,
            created_by: data.created_by,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: Id, patch: TaskPatch) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;
        if let Some(Some(assignee)) = patch.assignee {
            tables.require_user(assignee, "tasks_assignee_id_fkey")?;
        }

        let Some(task) = tables.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(assignee) = patch.assignee {
            task.assignee = assignee;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: Id) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.comments.iter().any(|c| c.task == id) {
            return Err(StoreError::MissingReference("comments_task_id_fkey".to_string()));
        }

        let before = tables.tasks.len();
        tables.tasks.retain(|t| t.id != id);
        Ok(tables.tasks.len() != before)
    }

    async fn list_comments_by_task(&self, task_id: Id) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.task == task_id)
            .cloned()
            .collect())
    }

    async fn count_comments_by_task(&self, task_id: Id) -> StoreResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().filter(|c| c.task == task_id).count() as u64)
    }

    async fn create_comment(&self, data: NewComment) -> StoreResult<Comment> {
        let mut tables = self.tables.write().await;
        if !tables.tasks.iter().any(|t| t.id == data.task) {
            return Err(StoreError::MissingReference("comments_task_id_fkey".to_string()));
        }
        tables.require_user(data.author, "comments_author_id_fkey")?;

        let now = Utc::now();
        let comment = Comment {
            id: Id::new_v4(),
            text: data.text,
            author: data.author,
            task: data.task,
            created_at: now,
            updated_at: now,
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn delete_comments_by_task(&self, task_id: Id) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.task != task_id);
        Ok((before - tables.comments.len()) as u64)
    }
}
