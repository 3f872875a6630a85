/// Projects

use tracing::info;

use super::Services;
use crate::auth::permissions::{authorize, is_admin, Operation};
use crate::error::{DomainError, DomainResult};
use crate::models::{
    project::{NewProject, Project},
    team::Team,
    user::User,
    Id,
};
use crate::store::{Store, StoreError};
use crate::validation::inputs::{CreateProjectInput, TeamIdInput};

const PROJECT_NAME_TAKEN: &str = "Project name already exists";

/// Loads a team the actor may work in: admin, or member
async fn accessible_team(store: &dyn Store, actor: &User, team_id: Id) -> DomainResult<Team> {
    let team = store
        .find_team(team_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Team not found"))?;

    if !is_admin(actor) && !team.has_member(actor.id) {
        return Err(DomainError::forbidden("You are not a member of this team"));
    }

    Ok(team)
}

/// Lists the projects of a team
pub async fn list_projects(services: &Services, actor: Option<&User>, input: TeamIdInput) -> DomainResult<Vec<Project>> {
    let actor = authorize(actor, Operation::Projects)?;
    let store = services.store();

    let team = accessible_team(store, actor, input.team_id).await?;
    Ok(store.list_projects_by_team(team.id).await?)
}

/// Creates a project in a team
///
/// Access is checked before name uniqueness so outsiders cannot discover
/// project names.
pub async fn create_project(
    services: &Services,
    actor: Option<&User>,
    input: CreateProjectInput,
) -> DomainResult<Project> {
    let actor = authorize(actor, Operation::CreateProject)?;
    let store = services.store();

    let team = accessible_team(store, actor, input.team_id).await?;

    if store.find_project_by_name(&input.name).await?.is_some() {
        return Err(DomainError::conflict(PROJECT_NAME_TAKEN));
    }

    let project = store
        .create_project(NewProject {
            name: input.name,
            team: team.id,
        })
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => DomainError::conflict(PROJECT_NAME_TAKEN),
            other => other.into(),
        })?;

    info!(project_id = %project.id, team_id = %team.id, actor_id = %actor.id, "Project created");
    Ok(project)
}
