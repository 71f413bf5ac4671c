/// PostgreSQL store backed by the model-level queries in [`crate::models`].

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreResult};
use crate::db::pool::health_check;
use crate::models::{
    activity_log::{ActivityLogEntry, EntityType, NewActivity},
    project::{CreateProject, Project, ProjectChanges},
    task::{CreateTask, Task, TaskChanges},
    team::{CreateTeam, Team},
    user::{CreateUser, User, UserSummary},
};

/// Store over a shared connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn find_users(&self, ids: &[Uuid]) -> StoreResult<Vec<UserSummary>> {
        Ok(User::find_summaries(&self.pool, ids).await?)
    }

    async fn create_team(&self, data: CreateTeam) -> StoreResult<Team> {
        Ok(Team::create(&self.pool, data).await?)
    }

    async fn find_team(&self, id: Uuid) -> StoreResult<Option<Team>> {
        Ok(Team::find_by_id(&self.pool, id).await?)
    }

    async fn add_team_member(&self, team_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        Ok(Team::add_member(&self.pool, team_id, user_id).await?)
    }

    async fn list_teams_for_member(&self, user_id: Uuid) -> StoreResult<Vec<Team>> {
        Ok(Team::list_by_member(&self.pool, user_id).await?)
    }

    async fn create_project(&self, data: CreateProject) -> StoreResult<Project> {
        Ok(Project::create(&self.pool, data).await?)
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(Project::find_by_id(&self.pool, id).await?)
    }

    async fn list_projects(&self, team_id: Uuid) -> StoreResult<Vec<Project>> {
        Ok(Project::list_by_team(&self.pool, team_id).await?)
    }

    async fn update_project(&self, id: Uuid, changes: &ProjectChanges) -> StoreResult<Option<Project>> {
        Ok(Project::update(&self.pool, id, changes).await?)
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        Ok(Project::delete(&self.pool, id).await?)
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn list_tasks(&self, project_id: Uuid) -> StoreResult<Vec<Task>> {
        Ok(Task::list_by_project(&self.pool, project_id).await?)
    }

    async fn update_task(&self, id: Uuid, changes: &TaskChanges) -> StoreResult<Option<Task>> {
        Ok(Task::update(&self.pool, id, changes).await?)
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        Ok(Task::delete(&self.pool, id).await?)
    }

    async fn append_activity(&self, data: NewActivity) -> StoreResult<ActivityLogEntry> {
        Ok(ActivityLogEntry::append(&self.pool, data).await?)
    }

    async fn list_activity(&self) -> StoreResult<Vec<ActivityLogEntry>> {
        Ok(ActivityLogEntry::list_all(&self.pool).await?)
    }

    async fn list_activity_for(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
    ) -> StoreResult<Vec<ActivityLogEntry>> {
        Ok(ActivityLogEntry::list_by_entity(&self.pool, entity_type, entity_id).await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(health_check(&self.pool).await?)
    }
}
