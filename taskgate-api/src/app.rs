/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskgate_api::{app::AppState, config::Config};
/// use taskgate_shared::store::memory::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = taskgate_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use taskgate_shared::{
    auth::{identity, jwt::TokenSettings, password::HashParams},
    models::user::User,
    ops::Services,
    store::Store,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Store, token settings and hashing cost shared by every operation
    pub services: Services,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state with production hashing cost
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self::with_hash_params(store, config, HashParams::default())
    }

    /// Creates new application state with explicit hashing cost
    pub fn with_hash_params(store: Arc<dyn Store>, config: Config, hash_params: HashParams) -> Self {
        let tokens = TokenSettings::new(config.jwt.secret.clone(), config.jwt.ttl_hours);

        Self {
            services: Services::new(store, tokens, hash_params),
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// The resolved caller of a request, `None` when anonymous
///
/// Inserted into request extensions by the identity layer; handlers take it
/// with `Extension<Actor>`.
#[derive(Debug, Clone, Default)]
pub struct Actor(pub Option<User>);

impl Actor {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                                  # Health check (public)
/// └── /v1/
///     ├── POST   /auth/register
///     ├── POST   /auth/login
///     ├── GET    /me
///     ├── GET    /users
///     ├── PATCH  /users/:user_id
///     ├── GET    /teams
///     ├── POST   /teams
///     ├── POST   /teams/:team_id/members
///     ├── DELETE /teams/:team_id/members/:user_id
///     ├── GET    /teams/:team_id/projects
///     ├── POST   /teams/:team_id/projects
///     ├── GET    /projects/:project_id/tasks
///     ├── POST   /projects/:project_id/tasks
///     ├── GET    /tasks/mine
///     ├── GET    /tasks/:task_id
///     ├── PATCH  /tasks/:task_id
///     ├── DELETE /tasks/:task_id
///     ├── POST   /tasks/:task_id/assign
///     └── POST   /tasks/:task_id/comments
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Identity resolution (everything under `/v1` except `/v1/auth`)
///
/// Identity never rejects a request; each operation applies its own gate.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no identity)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no identity)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Everything else sees an optional actor
    let resource_routes = Router::new()
        .route("/me", get(routes::users::me))
        .route("/users", get(routes::users::list_users))
        .route("/users/:user_id", patch(routes::users::update_user))
        .route("/teams", get(routes::teams::list_teams).post(routes::teams::create_team))
        .route("/teams/:team_id/members", post(routes::teams::add_member))
        .route(
            "/teams/:team_id/members/:user_id",
            axum::routing::delete(routes::teams::remove_member),
        )
        .route(
            "/teams/:team_id/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/projects/:project_id/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route("/tasks/mine", get(routes::tasks::my_tasks))
        .route(
            "/tasks/:task_id",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/tasks/:task_id/assign", post(routes::tasks::assign_task))
        .route("/tasks/:task_id/comments", post(routes::tasks::add_comment))
        .layer(axum::middleware::from_fn_with_state(state.clone(), identity_layer));

    let v1_routes = Router::new().nest("/auth", auth_routes).merge(resource_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Identity middleware layer
///
/// Reads the optional bearer credential, resolves it against the store and
/// injects the [`Actor`] into request extensions. Invalid credentials
/// resolve to an anonymous actor.
async fn identity_layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = identity::bearer_token(header).map(str::to_string);
    let user = identity::resolve(state.services.store(), state.jwt_secret(), token.as_deref()).await;

    req.extensions_mut().insert(Actor(user));

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_defaults_to_anonymous() {
        assert!(Actor::default().user().is_none());
    }
}
