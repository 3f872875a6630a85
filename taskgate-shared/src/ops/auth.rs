/// Registration, login and the current-user query

use serde::Serialize;
use tracing::{debug, info};

use super::Services;
use crate::auth::password::{hash_password, verify_against_nothing, verify_password};
use crate::error::{DomainError, DomainResult};
use crate::models::user::{NewUser, Role, User};
use crate::store::StoreError;
use crate::validation::inputs::{LoginInput, RegisterInput};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const EMAIL_TAKEN: &str = "Email already in use";

/// Token plus the user it was issued for
#[derive(Debug, Clone, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

/// Creates a MEMBER account and signs it in
///
/// # Errors
///
/// `Conflict` if the email is already registered
pub async fn register(services: &Services, input: RegisterInput) -> DomainResult<AuthPayload> {
    let store = services.store();

    if store.find_user_by_email(&input.email).await?.is_some() {
        return Err(DomainError::conflict(EMAIL_TAKEN));
    }

    let password_hash = hash_password(&input.password, &services.hash_params)?;

    let user = store
        .create_user(NewUser {
            name: input.name,
            email: input.email,
            password_hash,
            role: Role::Member,
        })
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => DomainError::conflict(EMAIL_TAKEN),
            other => other.into(),
        })?;

    let token = services.tokens.issue(user.id, user.role)?;

    info!(user_id = %user.id, "User registered");
    Ok(AuthPayload { token, user })
}

/// Verifies credentials and issues a token
///
/// Unknown email and wrong password fail identically and cost the same
/// Argon2 work.
pub async fn login(services: &Services, input: LoginInput) -> DomainResult<AuthPayload> {
    let Some(user) = services.store().find_user_by_email(&input.email).await? else {
        verify_against_nothing(&input.password, &services.hash_params)?;
        debug!("Login for unknown email");
        return Err(DomainError::unauthenticated(INVALID_CREDENTIALS));
    };

    if !verify_password(&input.password, &user.password_hash)? {
        debug!(user_id = %user.id, "Login with wrong password");
        return Err(DomainError::unauthenticated(INVALID_CREDENTIALS));
    }

    let token = services.tokens.issue(user.id, user.role)?;

    info!(user_id = %user.id, "User logged in");
    Ok(AuthPayload { token, user })
}

/// The authenticated actor, or `None` for anonymous requests
pub fn me(actor: Option<&User>) -> Option<User> {
    actor.cloned()
}
