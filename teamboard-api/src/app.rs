/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use teamboard_api::{app::AppState, config::Config};
/// use teamboard_shared::store::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = teamboard_api::app::build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:9000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use teamboard_shared::{
    auth::middleware::create_jwt_middleware,
    services::{ActivityRecorder, ProjectService, TaskService, TeamService},
    store::Store,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend
    pub store: Arc<dyn Store>,

    pub teams: TeamService,
    pub projects: ProjectService,
    pub tasks: TaskService,
    pub activity: ActivityRecorder,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires every service to the same store
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            teams: TeamService::new(store.clone()),
            projects: ProjectService::new(store.clone()),
            tasks: TaskService::new(store.clone()),
            activity: ActivityRecorder::new(store.clone()),
            store,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET /health                              # public
/// └── /api/
///     ├── /auth/
///     │   ├── POST /signup                     # public
///     │   ├── POST /login                      # public
///     │   └── GET  /me
///     ├── /teams/
///     │   ├── POST /
///     │   ├── POST /join
///     │   └── GET  /mine
///     ├── /projects/
///     │   ├── POST /
///     │   ├── GET  /:team_id
///     │   └── PUT | DELETE /:project_id
///     ├── /tasks/
///     │   ├── POST /
///     │   ├── GET  /:project_id
///     │   ├── PUT | DELETE /:task_id
///     │   └── PATCH /:task_id/status
///     └── /activity/
///         ├── GET /
///         └── GET /:entity_type/:entity_id
/// ```
///
/// Everything except health, signup and login requires a bearer token.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth = || middleware::from_fn(create_jwt_middleware(state.jwt_secret().to_string()));

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/me", get(routes::auth::me))
        .layer(auth())
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login));

    let team_routes = Router::new()
        .route("/", post(routes::teams::create_team))
        .route("/join", post(routes::teams::join_team))
        .route("/mine", get(routes::teams::my_teams));

    let project_routes = Router::new()
        .route("/", post(routes::projects::create_project))
        .route(
            "/:id",
            get(routes::projects::list_projects)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        );

    let task_routes = Router::new()
        .route("/", post(routes::tasks::create_task))
        .route(
            "/:id",
            get(routes::tasks::list_tasks)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/:id/status", patch(routes::tasks::update_status));

    let activity_routes = Router::new()
        .route("/", get(routes::activity::list_all))
        .route("/:entity_type/:entity_id", get(routes::activity::list_by_entity));

    let protected_routes = Router::new()
        .nest("/teams", team_routes)
        .nest("/projects", project_routes)
        .nest("/tasks", task_routes)
        .nest("/activity", activity_routes)
        .layer(auth());

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

/// Permissive CORS unless specific origins are configured
fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
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
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
