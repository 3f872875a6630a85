/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 token issuance and validation
/// - [`identity`]: bearer credential → actor resolution
/// - [`permissions`]: role gates and team-scoped resource predicates
///
/// # Example
///
/// ```no_run
/// use taskgate_shared::auth::password::{hash_password, verify_password, HashParams};
/// use taskgate_shared::auth::jwt::{validate_token, TokenSettings};
/// use taskgate_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password", &HashParams::default())?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let settings = TokenSettings::new("secret-key-at-least-32-bytes-long", 336);
/// let token = settings.issue(Uuid::new_v4(), Role::Member)?;
/// let claims = validate_token(&token, &settings.secret)?;
/// # Ok(())
/// # }
/// ```

pub mod identity;
pub mod jwt;
pub mod password;
pub mod permissions;
