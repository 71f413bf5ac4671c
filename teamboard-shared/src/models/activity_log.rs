/// Activity log model
///
/// Append-only audit trail. Entries are never updated or deleted, and the
/// domain entities hold no reference to them.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE activity_entity AS ENUM ('team', 'project', 'task');
///
/// CREATE TABLE activity_logs (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     seq BIGSERIAL NOT NULL,
///     user_id UUID NOT NULL REFERENCES users(id),
///     action VARCHAR(64) NOT NULL,
///     entity_type activity_entity NOT NULL,
///     entity_id UUID NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::UserSummary;

/// Kind of entity an entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "activity_entity", rename_all = "lowercase")]
pub enum EntityType {
    #[serde(alias = "team")]
    Team,

    #[serde(alias = "project")]
    Project,

    #[serde(alias = "task")]
    Task,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Team => "Team",
            EntityType::Project => "Project",
            EntityType::Task => "Task",
        }
    }
}

/// Recorded action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityAction {
    CreateTeam,
    JoinTeam,
    CreateProject,
    UpdateProject,
    DeleteProject,
    CreateTask,
    UpdateTask,
    DeleteTask,
    UpdateTaskStatus,
}

impl ActivityAction {
    /// Stored label
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::CreateTeam => "Create Team",
            ActivityAction::JoinTeam => "Join Team",
            ActivityAction::CreateProject => "Create Project",
            ActivityAction::UpdateProject => "Update Project",
            ActivityAction::DeleteProject => "Delete Project",
            ActivityAction::CreateTask => "Create Task",
            ActivityAction::UpdateTask => "Update Task",
            ActivityAction::DeleteTask => "Delete Task",
            ActivityAction::UpdateTaskStatus => "Update Task Status",
        }
    }

    /// Entity type this action applies to
    pub fn entity_type(&self) -> EntityType {
        match self {
            ActivityAction::CreateTeam | ActivityAction::JoinTeam => EntityType::Team,
            ActivityAction::CreateProject
            | ActivityAction::UpdateProject
            | ActivityAction::DeleteProject => EntityType::Project,
            ActivityAction::CreateTask
            | ActivityAction::UpdateTask
            | ActivityAction::DeleteTask
            | ActivityAction::UpdateTaskStatus => EntityType::Task,
        }
    }
}

/// Immutable audit entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityLogEntry {
    /// Entry ID
    pub id: Uuid,

    /// Acting user
    pub user_id: Uuid,

    /// Action label, e.g. "Create Task"
    pub action: String,

    /// Affected entity kind
    pub entity_type: EntityType,

    /// Affected entity ID
    pub entity_id: Uuid,

    /// Human-readable summary
    pub description: String,

    /// When the entry was written
    pub created_at: DateTime<Utc>,
}

/// Entry with the acting user expanded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    #[serde(flatten)]
    pub entry: ActivityLogEntry,

    /// Acting user (None if the account is gone)
    pub user: Option<UserSummary>,
}

/// Input for appending an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewActivity {
    pub user_id: Uuid,
    pub action: String,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub description: String,
}

const ACTIVITY_COLUMNS: &str = "id, user_id, action, entity_type, entity_id, description, created_at";

impl ActivityLogEntry {
    /// Appends an entry
    pub async fn append(pool: &PgPool, data: NewActivity) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO activity_logs (user_id, action, entity_type, entity_id, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ACTIVITY_COLUMNS}
            "#
        );

        sqlx::query_as::<_, ActivityLogEntry>(&query)
            .bind(data.user_id)
            .bind(data.action)
            .bind(data.entity_type)
            .bind(data.entity_id)
            .bind(data.description)
            .fetch_one(pool)
            .await
    }

    /// Lists every entry, newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activity_logs ORDER BY created_at DESC, seq DESC"
        );

        sqlx::query_as::<_, ActivityLogEntry>(&query)
            .fetch_all(pool)
            .await
    }

    /// Lists one entity's entries, newest first
    pub async fn list_by_entity(
        pool: &PgPool,
        entity_type: EntityType,
        entity_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {ACTIVITY_COLUMNS}
            FROM activity_logs
            WHERE entity_type = $1 AND entity_id = $2
            ORDER BY created_at DESC, seq DESC
            "#
        );

        sqlx::query_as::<_, ActivityLogEntry>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }
}
