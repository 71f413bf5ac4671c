/// Task model and database operations
///
/// Tasks live inside a project and carry a status plus zero or more
/// assignees.
///
/// # Status Graph
///
/// ```text
/// Todo ⇄ In Progress ⇄ QA Complete ⇄ Completed
///   (every status can move directly to every other status)
/// ```
///
/// No ordering is enforced. Status is a collaborative signal that any member
/// of the owning team may set to any value.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'qa_complete', 'completed');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     status task_status NOT NULL DEFAULT 'todo',
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     assigned_to UUID[] NOT NULL DEFAULT '{}',
///     created_by UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::UserSummary;

/// Task status
///
/// Serialized with the labels the web client displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Todo,

    /// Being worked on
    #[serde(rename = "In Progress")]
    InProgress,

    /// Passed QA
    #[serde(rename = "QA Complete")]
    QaComplete,

    /// Done
    Completed,
}

impl TaskStatus {
    /// All statuses in display order
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::QaComplete,
        TaskStatus::Completed,
    ];

    /// Returns the wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "Todo",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::QaComplete => "QA Complete",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task inside a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Task ID
    pub id: Uuid,

    /// Title
    pub title: String,

    /// Description
    pub description: String,

    /// Current status
    pub status: TaskStatus,

    /// Owning project
    pub project_id: Uuid,

    /// Assigned user IDs
    pub assigned_to: Vec<Uuid>,

    /// User who created the task
    pub created_by: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last changed
    pub updated_at: DateTime<Utc>,
}

/// Task with assignees and creator expanded to user records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetails {
    /// The task itself
    #[serde(flatten)]
    pub task: Task,

    /// Populated assignees, in assignment order
    pub assignees: Vec<UserSummary>,

    /// Populated creator (None if the account is gone)
    pub creator: Option<UserSummary>,
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Title
    pub title: String,

    /// Description (empty when not given)
    pub description: String,

    /// Owning project
    pub project_id: Uuid,

    /// Assignees, already validated against the team
    pub assigned_to: Vec<Uuid>,

    /// Creator
    pub created_by: Uuid,
}

/// Field-level task changes
///
/// `None` leaves a field untouched. `Some` replaces it, so an empty
/// description or an empty assignee list clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskChanges {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New assignee list
    pub assigned_to: Option<Vec<Uuid>>,

    /// New status
    pub status: Option<TaskStatus>,
}

impl TaskChanges {
    /// Change set touching only the status
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Applies the changes in place
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(assigned_to) = &self.assigned_to {
            task.assigned_to = assigned_to.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

const TASK_COLUMNS: &str =
    "id, title, description, status, project_id, assigned_to, created_by, created_at, updated_at";

impl Task {
    /// Creates a task in status `Todo`
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO tasks (title, description, project_id, assigned_to, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TASK_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(data.title)
            .bind(data.description)
            .bind(data.project_id)
            .bind(data.assigned_to)
            .bind(data.created_by)
            .fetch_one(pool)
            .await
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");

        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists a project's tasks, oldest first
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY created_at ASC"
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Applies field-level changes
    ///
    /// Returns `None` if the task no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        changes: &TaskChanges,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                assigned_to = COALESCE($4, assigned_to),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(changes.title.as_deref())
            .bind(changes.description.as_deref())
            .bind(changes.assigned_to.as_deref())
            .bind(changes.status)
            .fetch_optional(pool)
            .await
    }

    /// Deletes a task
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_labels() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::QaComplete).unwrap(),
            "\"QA Complete\""
        );

        let status: TaskStatus = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(status, TaskStatus::Completed);
        assert!(serde_json::from_str::<TaskStatus>("\"Blocked\"").is_err());
    }

    #[test]
    fn test_changes_apply() {
        let now = Utc::now();
        let assignee = Uuid::new_v4();
        let mut task = Task {
            id: Uuid::new_v4(),
            title: "Write docs".to_string(),
            description: "API reference".to_string(),
            status: TaskStatus::Todo,
            project_id: Uuid::new_v4(),
            assigned_to: vec![assignee],
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };

        TaskChanges {
            title: None,
            description: Some(String::new()),
            assigned_to: Some(Vec::new()),
            status: Some(TaskStatus::QaComplete),
        }
        .apply(&mut task);

        assert_eq!(task.title, "Write docs");
        assert!(task.description.is_empty());
        assert!(task.assigned_to.is_empty());
        assert_eq!(task.status, TaskStatus::QaComplete);
    }
}
