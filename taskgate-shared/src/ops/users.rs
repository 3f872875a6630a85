/// User administration

use tracing::info;

use super::Services;
use crate::auth::permissions::{authorize, Operation};
use crate::error::{DomainError, DomainResult};
use crate::models::user::{User, UserPatch};
use crate::validation::inputs::UpdateUserInput;

/// Lists every user (ADMIN)
pub async fn list_users(services: &Services, actor: Option<&User>) -> DomainResult<Vec<User>> {
    authorize(actor, Operation::Users)?;
    Ok(services.store().list_users().await?)
}

/// Changes a user's name and/or role (ADMIN)
///
/// Only fields present in the input are applied.
pub async fn update_user(services: &Services, actor: Option<&User>, input: UpdateUserInput) -> DomainResult<User> {
    let actor = authorize(actor, Operation::UpdateUser)?;
    let store = services.store();

    let patch = UserPatch {
        name: input.name,
        role: input.role,
    };

    let updated = if patch.is_empty() {
        store.find_user(input.user_id).await?
    } else {
        store.update_user(input.user_id, patch).await?
    };

    let user = updated.ok_or_else(|| DomainError::not_found("User not found"))?;

    info!(actor_id = %actor.id, user_id = %user.id, role = %user.role, "User updated");
    Ok(user)
}
