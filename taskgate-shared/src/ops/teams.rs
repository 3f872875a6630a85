/// Teams and team membership

use tracing::info;

use super::Services;
use crate::auth::permissions::{authorize, can_manage_team, is_admin, Operation};
use crate::error::{DomainError, DomainResult};
use crate::models::{
    team::{NewTeam, Team},
    user::User,
    Id,
};
use crate::store::StoreError;
use crate::validation::inputs::{CreateTeamInput, TeamMemberInput};

const TEAM_NAME_TAKEN: &str = "Team name already exists";
const CANNOT_MANAGE: &str = "Only the team creator or an admin can manage members";

/// Lists teams: all of them for ADMIN, the actor's own for MANAGER
pub async fn list_teams(services: &Services, actor: Option<&User>) -> DomainResult<Vec<Team>> {
    let actor = authorize(actor, Operation::Teams)?;
    let store = services.store();

    let teams = if is_admin(actor) {
        store.list_teams().await?
    } else {
        store.list_teams_by_member(actor.id).await?
    };

    Ok(teams)
}

/// Creates a team with the actor as first member
///
/// Extra members are deduplicated and must all exist.
pub async fn create_team(services: &Services, actor: Option<&User>, input: CreateTeamInput) -> DomainResult<Team> {
    let actor = authorize(actor, Operation::CreateTeam)?;
    let store = services.store();

    if store.find_team_by_name(&input.name).await?.is_some() {
        return Err(DomainError::conflict(TEAM_NAME_TAKEN));
    }

    let mut members: Vec<Id> = vec![actor.id];
    for id in input.members.unwrap_or_default() {
        if !members.contains(&id) {
            members.push(id);
        }
    }

    let extra = &members[1..];
    if !extra.is_empty() && store.list_users_by_ids(extra).await?.len() != extra.len() {
        return Err(DomainError::not_found("User not found"));
    }

    let team = store
        .create_team(NewTeam {
            name: input.name,
            members,
            created_by: actor.id,
        })
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => DomainError::conflict(TEAM_NAME_TAKEN),
            StoreError::MissingReference(_) => DomainError::not_found("User not found"),
            other => other.into(),
        })?;

    info!(team_id = %team.id, actor_id = %actor.id, members = team.members.len(), "Team created");
    Ok(team)
}

/// Adds a user to a team; adding an existing member changes nothing
pub async fn add_user_to_team(
    services: &Services,
    actor: Option<&User>,
    input: TeamMemberInput,
) -> DomainResult<Team> {
    let actor = authorize(actor, Operation::AddUserToTeam)?;
    let store = services.store();

    if !can_manage_team(store, actor, input.team_id).await? {
        return Err(DomainError::forbidden(CANNOT_MANAGE));
    }

    if store.find_team(input.team_id).await?.is_none() {
        return Err(DomainError::not_found("Team not found"));
    }
    if store.find_user(input.user_id).await?.is_none() {
        return Err(DomainError::not_found("User not found"));
    }

    let team = store
        .add_team_member(input.team_id, input.user_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Team not found"))?;

    info!(team_id = %team.id, user_id = %input.user_id, actor_id = %actor.id, "Team member added");
    Ok(team)
}

/// Removes a member from a team
///
/// The member is unassigned from every task of the team's projects, so an
/// assignee is always a member of the owning team.
///
/// # Errors
///
/// `BadRequest` when the user is not a member
pub async fn remove_user_from_team(
    services: &Services,
    actor: Option<&User>,
    input: TeamMemberInput,
) -> DomainResult<Team> {
    let actor = authorize(actor, Operation::RemoveUserFromTeam)?;
    let store = services.store();

    if !can_manage_team(store, actor, input.team_id).await? {
        return Err(DomainError::forbidden(CANNOT_MANAGE));
    }

    let team = store
        .find_team(input.team_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Team not found"))?;

    if !team.has_member(input.user_id) {
        return Err(DomainError::bad_request("User is not a member of this team"));
    }

    let team = store
        .remove_team_member(input.team_id, input.user_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Team not found"))?;

    info!(team_id = %team.id, user_id = %input.user_id, actor_id = %actor.id, "Team member removed");
    Ok(team)
}
