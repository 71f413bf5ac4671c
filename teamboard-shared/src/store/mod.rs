/// Persistence port
///
/// Every service reads and writes through the [`Store`] trait. Two adapters
/// ship with the crate:
///
/// - [`postgres::PgStore`]: PostgreSQL through `sqlx`
/// - [`memory::MemoryStore`]: in-process maps, used by tests and by the
///   server when no database is configured
///
/// Stores have last-write-wins semantics and no optimistic concurrency
/// token. Nothing here caches membership or roles.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    activity_log::{ActivityLogEntry, EntityType, NewActivity},
    project::{CreateProject, Project, ProjectChanges},
    task::{CreateTask, Task, TaskChanges},
    team::{CreateTeam, Team},
    user::{CreateUser, User, UserSummary},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store implementations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique constraint violated (e.g. duplicate email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Backend unusable (poisoned state, closed pool)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let target = db_err.constraint().unwrap_or("unique constraint");
                let message = if target.contains("email") {
                    "Email already exists".to_string()
                } else {
                    format!("Constraint violation: {}", target)
                };
                return StoreError::Conflict(message);
            }
        }

        if matches!(err, sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut) {
            return StoreError::Unavailable(err.to_string());
        }

        StoreError::Database(err)
    }
}

/// Persistence contract for users, teams, projects, tasks and activity
#[async_trait]
pub trait Store: Send + Sync {
    /// Stores a new user
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the email is taken.
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    /// Finds a user by ID
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Finds a user by email, ignoring case
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Loads summaries for the given IDs; unknown IDs are skipped
    async fn find_users(&self, ids: &[Uuid]) -> StoreResult<Vec<UserSummary>>;

    /// Stores a team with its creator as the only member
    async fn create_team(&self, data: CreateTeam) -> StoreResult<Team>;

    /// Finds a team with its current members
    async fn find_team(&self, id: Uuid) -> StoreResult<Option<Team>>;

    /// Adds a member; returns `false` when the user already belonged
    async fn add_team_member(&self, team_id: Uuid, user_id: Uuid) -> StoreResult<bool>;

    /// Lists the teams a user belongs to
    async fn list_teams_for_member(&self, user_id: Uuid) -> StoreResult<Vec<Team>>;

    /// Stores a project
    async fn create_project(&self, data: CreateProject) -> StoreResult<Project>;

    /// Finds a project by ID
    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>>;

    /// Lists a team's projects
    async fn list_projects(&self, team_id: Uuid) -> StoreResult<Vec<Project>>;

    /// Applies changes; `None` when the project is gone
    async fn update_project(&self, id: Uuid, changes: &ProjectChanges) -> StoreResult<Option<Project>>;

    /// Deletes a project and its tasks; `false` when nothing was deleted
    async fn delete_project(&self, id: Uuid) -> StoreResult<bool>;

    /// Stores a task
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task>;

    /// Finds a task by ID
    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// Lists a project's tasks
    async fn list_tasks(&self, project_id: Uuid) -> StoreResult<Vec<Task>>;

    /// Applies changes; `None` when the task is gone
    async fn update_task(&self, id: Uuid, changes: &TaskChanges) -> StoreResult<Option<Task>>;

    /// Deletes a task; `false` when nothing was deleted
    async fn delete_task(&self, id: Uuid) -> StoreResult<bool>;

    /// Appends an audit entry
    async fn append_activity(&self, data: NewActivity) -> StoreResult<ActivityLogEntry>;

    /// Lists every audit entry, newest first
    async fn list_activity(&self) -> StoreResult<Vec<ActivityLogEntry>>;

    /// Lists one entity's audit entries, newest first
    async fn list_activity_for(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
    ) -> StoreResult<Vec<ActivityLogEntry>>;

    /// Checks that the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}
