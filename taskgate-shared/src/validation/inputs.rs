/// Typed inputs and their declared shapes
///
/// Wire names are camelCase. Path parameters are merged into the payload
/// before validation wherever the shape declares them (`userId`, `teamId`,
/// `taskId`, `projectId`).

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{double_option, FieldSpec, Kind, Presence, Rule, Shape, Shaped, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};
use crate::models::{task::TaskStatus, user::Role, Id};

const TRIMMED: &[Rule] = &[Rule::Trim];
const TRIMMED_NOT_EMPTY: &[Rule] = &[Rule::Trim, Rule::NotEmpty];
const EMAIL: &[Rule] = &[Rule::Trim, Rule::Lowercase, Rule::Email];

const fn id(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, Kind::Id, Presence::Required, &[])
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Shaped for RegisterInput {
    const SHAPE: Shape = Shape {
        name: "Register",
        fields: &[
            FieldSpec::new("name", Kind::String, Presence::Required, &[Rule::Trim, Rule::NotEmpty, Rule::MaxLength(100)]),
            FieldSpec::new("email", Kind::String, Presence::Required, EMAIL),
            FieldSpec::new("password", Kind::String, Presence::Required, &[Rule::MinLength(6)]),
        ],
    };
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl Shaped for LoginInput {
    const SHAPE: Shape = Shape {
        name: "Login",
        fields: &[
            FieldSpec::new("email", Kind::String, Presence::Required, EMAIL),
            FieldSpec::new("password", Kind::String, Presence::Required, &[Rule::NotEmpty]),
        ],
    };
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    pub user_id: Id,
    pub name: Option<String>,
    pub role: Option<Role>,
}

impl Shaped for UpdateUserInput {
    const SHAPE: Shape = Shape {
        name: "UpdateUser",
        fields: &[
            id("userId"),
            FieldSpec::new("name", Kind::String, Presence::Optional, TRIMMED_NOT_EMPTY),
            FieldSpec::new("role", Kind::Enum(Role::NAMES), Presence::Optional, &[]),
        ],
    };
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeamInput {
    pub name: String,
    pub members: Option<Vec<Id>>,
}

impl Shaped for CreateTeamInput {
    const SHAPE: Shape = Shape {
        name: "CreateTeam",
        fields: &[
            FieldSpec::new("name", Kind::String, Presence::Required, TRIMMED_NOT_EMPTY),
            FieldSpec::new("members", Kind::IdList, Presence::Optional, &[]),
        ],
    };
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberInput {
    pub team_id: Id,
    pub user_id: Id,
}

impl Shaped for TeamMemberInput {
    const SHAPE: Shape = Shape {
        name: "TeamMember",
        fields: &[id("teamId"), id("userId")],
    };
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamIdInput {
    pub team_id: Id,
}

impl Shaped for TeamIdInput {
    const SHAPE: Shape = Shape {
        name: "TeamId",
        fields: &[id("teamId")],
    };
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
    pub team_id: Id,
    pub name: String,
}

impl Shaped for CreateProjectInput {
    const SHAPE: Shape = Shape {
        name: "CreateProject",
        fields: &[
            id("teamId"),
            FieldSpec::new("name", Kind::String, Presence::Required, TRIMMED_NOT_EMPTY),
        ],
    };
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIdInput {
    pub project_id: Id,
}

impl Shaped for ProjectIdInput {
    const SHAPE: Shape = Shape {
        name: "ProjectId",
        fields: &[id("projectId")],
    };
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub assignee_id: Option<Id>,
    pub due_date: Option<DateTime<Utc>>,
}

impl Shaped for CreateTaskInput {
    const SHAPE: Shape = Shape {
        name: "CreateTask",
        fields: &[
            FieldSpec::new("title", Kind::String, Presence::Required, TRIMMED_NOT_EMPTY),
            FieldSpec::new("description", Kind::String, Presence::Optional, TRIMMED),
            FieldSpec::new("status", Kind::Enum(TaskStatus::NAMES), Presence::Optional, &[]),
            FieldSpec::new("assigneeId", Kind::Id, Presence::Optional, &[]),
            FieldSpec::new("dueDate", Kind::Date, Presence::Optional, &[]),
        ],
    };
}

/// Partial task update
///
/// For `description`, `assignee_id` and `due_date`: `None` leaves the field
/// unchanged, `Some(None)` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskInput {
    pub title: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    pub status: Option<TaskStatus>,

    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<Id>>,

    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl Shaped for UpdateTaskInput {
    const SHAPE: Shape = Shape {
        name: "UpdateTask",
        fields: &[
            FieldSpec::new("title", Kind::String, Presence::Optional, TRIMMED_NOT_EMPTY),
            FieldSpec::new("description", Kind::String, Presence::Nullable, TRIMMED),
            FieldSpec::new("status", Kind::Enum(TaskStatus::NAMES), Presence::Optional, &[]),
            FieldSpec::new("assigneeId", Kind::Id, Presence::Nullable, &[]),
            FieldSpec::new("dueDate", Kind::Date, Presence::Nullable, &[]),
        ],
    };
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskInput {
    pub task_id: Id,
    pub user_id: Id,
}

impl Shaped for AssignTaskInput {
    const SHAPE: Shape = Shape {
        name: "AssignTask",
        fields: &[id("taskId"), id("userId")],
    };
}

/// Paginated task listing of one project
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    pub project_id: Id,
    pub page: u64,
    pub limit: u64,
    pub status: Option<TaskStatus>,
}

impl Shaped for TaskListQuery {
    const SHAPE: Shape = Shape {
        name: "TaskListQuery",
        fields: &[
            id("projectId"),
            FieldSpec::new("page", Kind::Integer, Presence::DefaultInt(DEFAULT_PAGE), &[Rule::Min(1)]),
            FieldSpec::new(
                "limit",
                Kind::Integer,
                Presence::DefaultInt(DEFAULT_LIMIT),
                &[Rule::Min(1), Rule::Max(MAX_LIMIT)],
            ),
            FieldSpec::new("status", Kind::Enum(TaskStatus::NAMES), Presence::Optional, &[]),
        ],
    };
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenericIdInput {
    pub id: Id,
}

impl Shaped for GenericIdInput {
    const SHAPE: Shape = Shape {
        name: "GenericId",
        fields: &[id("id")],
    };
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentInput {
    pub task_id: Id,
    pub text: String,
}

impl Shaped for AddCommentInput {
    const SHAPE: Shape = Shape {
        name: "AddComment",
        fields: &[
            id("taskId"),
            FieldSpec::new("text", Kind::String, Presence::Required, TRIMMED_NOT_EMPTY),
        ],
    };
}
