/// Permission engine
///
/// Two layers decide whether an actor may perform an operation:
///
/// 1. **Role gates**: every [`Operation`] has a static allowed-role set,
///    checked with [`require_role`] before any state is touched.
/// 2. **Resource predicates**: team, project and task access is always
///    mediated through membership in the owning team. Admins pass every
///    resource predicate once the resource exists.
///
/// # Role Table
///
/// | Operation | Allowed roles |
/// |-----------|---------------|
/// | `register`, `login`, `me` | public |
/// | `users`, `updateUser` | ADMIN |
/// | `teams`, `createTeam`, `addUserToTeam`, `removeUserFromTeam` | ADMIN, MANAGER |
/// | `createProject` | ADMIN, MANAGER |
/// | `createTask`, `assignTask`, `updateTask`, `deleteTask` | ADMIN, MANAGER |
/// | `projects`, `tasks`, `task`, `myTasks`, `addComment` | ADMIN, MANAGER, MEMBER |
///
/// # Example
///
/// ```no_run
/// use taskgate_shared::auth::permissions::{authorize, has_task_access, Operation};
/// use taskgate_shared::models::{user::User, Id};
/// use taskgate_shared::store::Store;
///
/// # async fn example(store: &dyn Store, actor: Option<&User>, task_id: Id) -> Result<(), Box<dyn std::error::Error>> {
/// let actor = authorize(actor, Operation::UpdateTask)?;
/// if !has_task_access(store, actor, task_id).await? {
///     // Forbidden
/// }
/// # Ok(())
/// # }
/// ```

use crate::models::{
    user::{Role, User},
    Id,
};
use crate::store::{Store, StoreError};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// No authenticated actor
    #[error("Authentication required")]
    Unauthenticated,

    /// Actor's role is not in the allowed set
    #[error("Insufficient permissions: requires one of {required:?}, has {actual}")]
    InsufficientRole {
        required: &'static [Role],
        actual: Role,
    },

    /// Store failure while evaluating a predicate
    #[error(transparent)]
    Store(#[from] StoreError),
}

const ADMIN_ONLY: &[Role] = &[Role::Admin];
const ADMIN_MANAGER: &[Role] = &[Role::Admin, Role::Manager];
const ANY_ROLE: &[Role] = &[Role::Admin, Role::Manager, Role::Member];

/// Every query and mutation exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Register,
    Login,
    Me,
    Users,
    UpdateUser,
    Teams,
    CreateTeam,
    AddUserToTeam,
    RemoveUserFromTeam,
    Projects,
    CreateProject,
    Tasks,
    Task,
    MyTasks,
    CreateTask,
    AssignTask,
    UpdateTask,
    DeleteTask,
    AddComment,
}

impl Operation {
    pub const ALL: [Operation; 19] = [
        Operation::Register,
        Operation::Login,
        Operation::Me,
        Operation::Users,
        Operation::UpdateUser,
        Operation::Teams,
        Operation::CreateTeam,
        Operation::AddUserToTeam,
        Operation::RemoveUserFromTeam,
        Operation::Projects,
        Operation::CreateProject,
        Operation::Tasks,
        Operation::Task,
        Operation::MyTasks,
        Operation::CreateTask,
        Operation::AssignTask,
        Operation::UpdateTask,
        Operation::DeleteTask,
        Operation::AddComment,
    ];

    /// Operation name as exposed by the API
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Register => "register",
            Operation::Login => "login",
            Operation::Me => "me",
            Operation::Users => "users",
            Operation::UpdateUser => "updateUser",
            Operation::Teams => "teams",
            Operation::CreateTeam => "createTeam",
            Operation::AddUserToTeam => "addUserToTeam",
            Operation::RemoveUserFromTeam => "removeUserFromTeam",
            Operation::Projects => "projects",
            Operation::CreateProject => "createProject",
            Operation::Tasks => "tasks",
            Operation::Task => "task",
            Operation::MyTasks => "myTasks",
            Operation::CreateTask => "createTask",
            Operation::AssignTask => "assignTask",
            Operation::UpdateTask => "updateTask",
            Operation::DeleteTask => "deleteTask",
            Operation::AddComment => "addComment",
        }
    }

    /// Roles allowed to invoke the operation; `None` for public operations
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Operation::Register | Operation::Login | Operation::Me => None,
            Operation::Users | Operation::UpdateUser => Some(ADMIN_ONLY),
            Operation::Teams
            | Operation::CreateTeam
            | Operation::AddUserToTeam
            | Operation::RemoveUserFromTeam
            | Operation::CreateProject
            | Operation::CreateTask
            | Operation::AssignTask
            | Operation::UpdateTask
            | Operation::DeleteTask => Some(ADMIN_MANAGER),
            Operation::Projects
            | Operation::Tasks
            | Operation::Task
            | Operation::MyTasks
            | Operation::AddComment => Some(ANY_ROLE),
        }
    }

    /// Whether an actor with `role` (or anonymous, for `None`) passes the gate
    pub fn permits(&self, role: Option<Role>) -> bool {
        match (self.allowed_roles(), role) {
            (None, _) => true,
            (Some(roles), Some(role)) => roles.contains(&role),
            (Some(_), None) => false,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fails with `Unauthenticated` when no actor is present
pub fn require_authenticated(actor: Option<&User>) -> Result<&User, AuthzError> {
    actor.ok_or(AuthzError::Unauthenticated)
}

/// Checks authentication, then that the actor's role is in `roles`
pub fn require_role<'a>(actor: Option<&'a User>, roles: &'static [Role]) -> Result<&'a User, AuthzError> {
    let actor = require_authenticated(actor)?;

    if !roles.contains(&actor.role) {
        tracing::debug!(user_id = %actor.id, role = %actor.role, "Role gate denied");
        return Err(AuthzError::InsufficientRole {
            required: roles,
            actual: actor.role,
        });
    }

    Ok(actor)
}

/// Applies the role gate of a non-public operation
///
/// Public operations only require authentication here; their handlers
/// do not call this.
pub fn authorize(actor: Option<&User>, operation: Operation) -> Result<&User, AuthzError> {
    match operation.allowed_roles() {
        Some(roles) => require_role(actor, roles),
        None => require_authenticated(actor),
    }
}

pub fn is_admin(user: &User) -> bool {
    user.role == Role::Admin
}

/// True when the team exists and lists the user as a member
pub async fn is_team_member(store: &dyn Store, user_id: Id, team_id: Id) -> Result<bool, AuthzError> {
    Ok(store.is_team_member(team_id, user_id).await?)
}

/// Admin, or creator of an existing team
pub async fn can_manage_team(store: &dyn Store, actor: &User, team_id: Id) -> Result<bool, AuthzError> {
    if is_admin(actor) {
        return Ok(true);
    }

    Ok(store
        .find_team(team_id)
        .await?
        .map_or(false, |team| team.created_by == actor.id))
}

/// Project exists and the actor is an admin or a member of its team
pub async fn has_project_access(store: &dyn Store, actor: &User, project_id: Id) -> Result<bool, AuthzError> {
    let Some(project) = store.find_project(project_id).await? else {
        return Ok(false);
    };

    if is_admin(actor) {
        return Ok(true);
    }

    is_team_member(store, actor.id, project.team).await
}

/// Task exists and the actor is an admin or a member of its project's team
pub async fn has_task_access(store: &dyn Store, actor: &User, task_id: Id) -> Result<bool, AuthzError> {
    let Some(task) = store.find_task(task_id).await? else {
        return Ok(false);
    };

    if is_admin(actor) {
        return Ok(true);
    }

    has_project_access(store, actor, task.project).await
}
