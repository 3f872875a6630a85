/// Identity resolution
///
/// Turns a bearer credential into the authenticated actor. Resolution fails
/// open: a missing, malformed, expired or foreign credential yields an
/// anonymous request, and each operation then applies its own gate.
///
/// The user is re-read from the store on every request, so role changes and
/// removed accounts take effect immediately regardless of what the token
/// says.

use tracing::{debug, warn};

use super::jwt::validate_token;
use crate::models::user::User;
use crate::store::Store;

/// Extracts the token from an `Authorization` header value
///
/// Only `Bearer <token>` is recognized; any other form is no credential.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let token = header?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Resolves a credential to a user, or `None` for anonymous
pub async fn resolve(store: &dyn Store, secret: &str, credential: Option<&str>) -> Option<User> {
    let token = credential?;

    let claims = match validate_token(token, secret) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, "Ignoring invalid credential");
            return None;
        }
    };

    match store.find_user(claims.sub).await {
        Ok(Some(user)) => {
            if user.role != claims.role {
                debug!(user_id = %user.id, token_role = %claims.role, role = %user.role, "Token role is stale");
            }
            Some(user)
        }
        Ok(None) => {
            debug!(user_id = %claims.sub, "Credential refers to a missing user");
            None
        }
        Err(e) => {
            warn!(user_id = %claims.sub, error = %e, "Failed to load user for credential");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, Claims, TokenSettings};
    use crate::models::{
        user::{NewUser, Role, UserPatch},
        Id,
    };
    use crate::store::memory::MemoryStore;
    use chrono::Duration;

    const SECRET: &str = "identity-test-secret-at-least-32-bytes";

    async fn seed(store: &MemoryStore) -> User {
        store
            .create_user(NewUser {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: "hash".to_string(),
                role: Role::Member,
            })
            .await
            .unwrap()
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(Some("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(Some("Basic abc")), None);
        assert_eq!(bearer_token(Some("bearer abc")), None);
        assert_eq!(bearer_token(Some("Bearer ")), None);
        assert_eq!(bearer_token(None), None);
    }

    #[tokio::test]
    async fn test_resolve_without_credential() {
        let store = MemoryStore::new();
        assert!(resolve(&store, SECRET, None).await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_valid_token() {
        let store = MemoryStore::new();
        let user = seed(&store).await;
        let token = TokenSettings::new(SECRET, 1).issue(user.id, user.role).unwrap();

        let resolved = resolve(&store, SECRET, Some(&token)).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn test_resolve_uses_current_role() {
        let store = MemoryStore::new();
        let user = seed(&store).await;
        let token = TokenSettings::new(SECRET, 1).issue(user.id, Role::Member).unwrap();

        store
            .update_user(user.id, UserPatch { role: Some(Role::Admin), ..Default::default() })
            .await
            .unwrap();

        let resolved = resolve(&store, SECRET, Some(&token)).await.unwrap();
        assert_eq!(resolved.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_resolve_fails_open() {
        let store = MemoryStore::new();
        let user = seed(&store).await;

        assert!(resolve(&store, SECRET, Some("garbage")).await.is_none());

        let expired = create_token(&Claims::new(user.id, user.role, Duration::seconds(-60)), SECRET).unwrap();
        assert!(resolve(&store, SECRET, Some(&expired)).await.is_none());

        let foreign = TokenSettings::new("some-other-secret-at-least-32-bytes", 1)
            .issue(user.id, user.role)
            .unwrap();
        assert!(resolve(&store, SECRET, Some(&foreign)).await.is_none());

        let missing = TokenSettings::new(SECRET, 1).issue(Id::new_v4(), Role::Admin).unwrap();
        assert!(resolve(&store, SECRET, Some(&missing)).await.is_none());
    }
}
