/// Domain operations
///
/// One async function per query or mutation. Every operation takes the
/// shared [`Services`], the resolved actor (`None` for anonymous requests)
/// and an already-validated typed input, and applies its role gate before
/// touching any state.
///
/// Operations return plain entities; embedding related entities for
/// responses is done separately with [`crate::relations::populate`].
///
/// # Modules
///
/// - [`auth`]: register, login, me
/// - [`users`]: users, updateUser
/// - [`teams`]: teams, createTeam, addUserToTeam, removeUserFromTeam
/// - [`projects`]: projects, createProject
/// - [`tasks`]: tasks, task, myTasks, createTask, assignTask, updateTask, deleteTask
/// - [`comments`]: addComment
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskgate_shared::auth::{jwt::TokenSettings, password::HashParams};
/// use taskgate_shared::ops::{self, Services};
/// use taskgate_shared::store::memory::MemoryStore;
/// use taskgate_shared::validation::{inputs::RegisterInput, validate};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let services = Services::new(
///     Arc::new(MemoryStore::new()),
///     TokenSettings::new("secret-key-at-least-32-bytes-long", 336),
///     HashParams::default(),
/// );
///
/// let input: RegisterInput = validate(serde_json::json!({
///     "name": "Ada",
///     "email": "ada@example.com",
///     "password": "secret1",
/// }))?;
/// let session = ops::auth::register(&services, input).await?;
/// println!("token: {}", session.token);
/// # Ok(())
/// # }
/// ```

pub mod auth;
pub mod comments;
pub mod projects;
pub mod tasks;
pub mod teams;
pub mod users;

use std::sync::Arc;

use crate::auth::{jwt::TokenSettings, password::HashParams};
use crate::store::Store;

/// Collaborators shared by every operation
#[derive(Clone)]
pub struct Services {
    /// Entity store
    pub store: Arc<dyn Store>,

    /// Token signing settings
    pub tokens: TokenSettings,

    /// Password hashing cost
    pub hash_params: HashParams,
}

impl Services {
    pub fn new(store: Arc<dyn Store>, tokens: TokenSettings, hash_params: HashParams) -> Self {
        Self {
            store,
            tokens,
            hash_params,
        }
    }

    /// Store as a trait object reference
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}
