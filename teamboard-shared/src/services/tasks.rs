/// Task lifecycle manager.
///
/// Owns task creation, listing, edits, status changes and deletion. Every
/// assignee list is checked against the team's membership at the time of
/// the request, and every successful mutation writes exactly one activity
/// entry.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::{required_text, ActivityRecorder, OwnershipResolver, ServiceError, ServiceResult};
use crate::auth::authorization::{authorize, check_assignees, Capability, Scope};
use crate::auth::middleware::AuthContext;
use crate::models::activity_log::ActivityAction;
use crate::models::task::{CreateTask, Task, TaskChanges, TaskDetails, TaskStatus};
use crate::models::user::UserSummary;
use crate::store::Store;

/// Input for [`TaskService::create_task`]
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub project_id: Uuid,
    pub assigned_to: Vec<Uuid>,
}

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn Store>,
    resolver: OwnershipResolver,
    activity: ActivityRecorder,
}

/// Drops repeated IDs, keeping first occurrences in order
fn dedup_assignees(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

impl TaskService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            resolver: OwnershipResolver::new(store.clone()),
            activity: ActivityRecorder::new(store.clone()),
            store,
        }
    }

    /// Creates a task in status `Todo`
    ///
    /// # Errors
    ///
    /// `InvalidAssignment` when any assignee is not a member of the owning
    /// team; nothing is stored in that case.
    pub async fn create_task(&self, caller: &AuthContext, input: NewTask) -> ServiceResult<Task> {
        let chain = self.resolver.resolve_project(input.project_id).await?;
        authorize(caller, Capability::CreateTask, Scope::Team(&chain.team))?;

        let title = required_text("title", &input.title)?;
        let assigned_to = dedup_assignees(input.assigned_to);
        check_assignees(&chain.team, &assigned_to)?;

        let task = self
            .store
            .create_task(CreateTask {
                title,
                description: input.description.unwrap_or_default(),
                project_id: chain.project.id,
                assigned_to,
                created_by: caller.user_id,
            })
            .await?;

        info!(task_id = %task.id, project_id = %chain.project.id, "Task created");
        self.activity
            .record(
                caller.user_id,
                ActivityAction::CreateTask,
                task.id,
                format!(
                    "{} created task \"{}\" in project \"{}\"",
                    caller.name, task.title, chain.project.name
                ),
            )
            .await;

        Ok(task)
    }

    /// Tasks of a project, with assignees and creator populated
    pub async fn list_tasks(&self, caller: &AuthContext, project_id: Uuid) -> ServiceResult<Vec<TaskDetails>> {
        let chain = self.resolver.resolve_project(project_id).await?;
        authorize(caller, Capability::ViewTeam, Scope::Team(&chain.team))?;

        let tasks = self.store.list_tasks(chain.project.id).await?;

        let mut ids: Vec<Uuid> = tasks
            .iter()
            .flat_map(|t| t.assigned_to.iter().copied().chain(std::iter::once(t.created_by)))
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let users: HashMap<Uuid, UserSummary> = self
            .store
            .find_users(&ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        Ok(tasks
            .into_iter()
            .map(|task| TaskDetails {
                assignees: task
                    .assigned_to
                    .iter()
                    .filter_map(|id| users.get(id).cloned())
                    .collect(),
                creator: users.get(&task.created_by).cloned(),
                task,
            })
            .collect())
    }

    /// Applies partial edits
    ///
    /// Only the creator, or a privileged member of the owning team, may
    /// edit. A new assignee list is validated against current membership.
    pub async fn update_task(
        &self,
        caller: &AuthContext,
        task_id: Uuid,
        mut changes: TaskChanges,
    ) -> ServiceResult<Task> {
        let chain = self.resolver.resolve_task(task_id).await?;
        authorize(
            caller,
            Capability::EditTask,
            Scope::Task {
                team: &chain.team,
                created_by: chain.task.created_by,
            },
        )?;

        if let Some(title) = &changes.title {
            changes.title = Some(required_text("title", title)?);
        }
        if let Some(assigned_to) = changes.assigned_to.take() {
            let assigned_to = dedup_assignees(assigned_to);
            check_assignees(&chain.team, &assigned_to)?;
            changes.assigned_to = Some(assigned_to);
        }

        let task = self
            .store
            .update_task(chain.task.id, &changes)
            .await?
            .ok_or(ServiceError::NotFound("Task"))?;

        info!(%task_id, user_id = %caller.user_id, "Task updated");
        self.activity
            .record(
                caller.user_id,
                ActivityAction::UpdateTask,
                task.id,
                format!("{} updated task \"{}\"", caller.name, task.title),
            )
            .await;

        Ok(task)
    }

    /// Moves a task to any status; open to every team member
    pub async fn update_status(
        &self,
        caller: &AuthContext,
        task_id: Uuid,
        status: TaskStatus,
    ) -> ServiceResult<Task> {
        let chain = self.resolver.resolve_task(task_id).await?;
        authorize(caller, Capability::ChangeTaskStatus, Scope::Team(&chain.team))?;

        // Statuses form a complete graph: any value may follow any other
        let from = chain.task.status;

        let task = self
            .store
            .update_task(chain.task.id, &TaskChanges::status(status))
            .await?
            .ok_or(ServiceError::NotFound("Task"))?;

        info!(%task_id, %from, to = %status, "Task status changed");
        self.activity
            .record(
                caller.user_id,
                ActivityAction::UpdateTaskStatus,
                task.id,
                format!(
                    "{} changed status of task \"{}\" to \"{}\"",
                    caller.name, task.title, status
                ),
            )
            .await;

        Ok(task)
    }

    pub async fn delete_task(&self, caller: &AuthContext, task_id: Uuid) -> ServiceResult<()> {
        let chain = self.resolver.resolve_task(task_id).await?;
        authorize(
            caller,
            Capability::DeleteTask,
            Scope::Task {
                team: &chain.team,
                created_by: chain.task.created_by,
            },
        )?;

        if !self.store.delete_task(chain.task.id).await? {
            return Err(ServiceError::NotFound("Task"));
        }

        info!(%task_id, user_id = %caller.user_id, "Task deleted");
        self.activity
            .record(
                caller.user_id,
                ActivityAction::DeleteTask,
                task_id,
                format!("{} deleted task \"{}\"", caller.name, chain.task.title),
            )
            .await;

        Ok(())
    }
}
