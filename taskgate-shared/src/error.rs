/// Domain error taxonomy
///
/// Every domain operation fails with a [`DomainError`]. Each kind carries a
/// stable machine-readable code and maps to one HTTP status; the API layer
/// renders it without further interpretation.
///
/// | Kind | Code | Status |
/// |------|------|--------|
/// | `ValidationFailed` | `VALIDATION_FAILED` | 422 |
/// | `Unauthenticated` | `UNAUTHENTICATED` | 401 |
/// | `Forbidden` | `FORBIDDEN` | 403 |
/// | `NotFound` | `NOT_FOUND` | 404 |
/// | `Conflict` | `CONFLICT` | 409 |
/// | `BadRequest` | `BAD_REQUEST` | 400 |
/// | `Internal` | `INTERNAL_ERROR` | 500 |
///
/// Module-level errors convert through `From`, so operations can use `?`
/// on store, authorization, token and password calls.

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::auth::permissions::AuthzError;
use crate::store::StoreError;
use crate::validation::FieldError;

/// Result alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Input rejected before reaching domain logic
    #[error("Validation failed: {} errors", .0.len())]
    ValidationFailed(Vec<FieldError>),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    /// Store, token or hashing failure; the detail is logged, never returned
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::ValidationFailed(_) => "VALIDATION_FAILED",
            DomainError::Unauthenticated(_) => "UNAUTHENTICATED",
            DomainError::Forbidden(_) => "FORBIDDEN",
            DomainError::NotFound(_) => "NOT_FOUND",
            DomainError::Conflict(_) => "CONFLICT",
            DomainError::BadRequest(_) => "BAD_REQUEST",
            DomainError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status code for this kind
    pub fn status(&self) -> u16 {
        match self {
            DomainError::ValidationFailed(_) => 422,
            DomainError::Unauthenticated(_) => 401,
            DomainError::Forbidden(_) => 403,
            DomainError::NotFound(_) => 404,
            DomainError::Conflict(_) => 409,
            DomainError::BadRequest(_) => 400,
            DomainError::Internal(_) => 500,
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        DomainError::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        DomainError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        DomainError::Conflict(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        DomainError::BadRequest(message.into())
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(constraint) => {
                DomainError::Conflict(format!("Duplicate value for {}", constraint))
            }
            StoreError::MissingReference(constraint) => {
                DomainError::BadRequest(format!("Referenced record does not exist ({})", constraint))
            }
            StoreError::Database(e) => DomainError::Internal(format!("Database error: {}", e)),
        }
    }
}

impl From<AuthzError> for DomainError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Unauthenticated => DomainError::Unauthenticated("Authentication required".to_string()),
            AuthzError::InsufficientRole { .. } => {
                DomainError::Forbidden("Insufficient permissions".to_string())
            }
            AuthzError::Store(e) => e.into(),
        }
    }
}

impl From<PasswordError> for DomainError {
    fn from(err: PasswordError) -> Self {
        DomainError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<JwtError> for DomainError {
    fn from(err: JwtError) -> Self {
        DomainError::Internal(format!("Token operation failed: {}", err))
    }
}
