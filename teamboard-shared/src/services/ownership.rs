/// Ownership chain resolver.
///
/// Tasks belong to projects, projects belong to teams. Authorization always
/// needs the owning team, so every task or project operation starts here.
/// Lookups go to the store on each call; nothing is cached between requests.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::models::{project::Project, task::Task, team::Team, user::UserSummary};
use crate::store::Store;

/// A project with its owning team
#[derive(Debug, Clone)]
pub struct ProjectChain {
    pub project: Project,
    pub team: Team,
}

/// A task with its owning project and team
#[derive(Debug, Clone)]
pub struct TaskChain {
    pub task: Task,
    pub project: Project,
    pub team: Team,
}

#[derive(Clone)]
pub struct OwnershipResolver {
    store: Arc<dyn Store>,
}

impl OwnershipResolver {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn resolve_team(&self, team_id: Uuid) -> ServiceResult<Team> {
        self.store
            .find_team(team_id)
            .await?
            .ok_or(ServiceError::NotFound("Team"))
    }

    /// Loads a project and its team
    ///
    /// A project whose team is gone is reported as not found and logged as
    /// an integrity problem.
    pub async fn resolve_project(&self, project_id: Uuid) -> ServiceResult<ProjectChain> {
        let project = self
            .store
            .find_project(project_id)
            .await?
            .ok_or(ServiceError::NotFound("Project"))?;

        let team = self.owning_team(&project).await?;

        Ok(ProjectChain { project, team })
    }

    /// Loads a task, its project and the project's team
    pub async fn resolve_task(&self, task_id: Uuid) -> ServiceResult<TaskChain> {
        let task = self
            .store
            .find_task(task_id)
            .await?
            .ok_or(ServiceError::NotFound("Task"))?;

        let project = self.store.find_project(task.project_id).await?.ok_or_else(|| {
            warn!(
                task_id = %task.id,
                project_id = %task.project_id,
                "Task references a missing project"
            );
            ServiceError::NotFound("Project")
        })?;

        let team = self.owning_team(&project).await?;

        Ok(TaskChain { task, project, team })
    }

    async fn owning_team(&self, project: &Project) -> ServiceResult<Team> {
        self.store.find_team(project.team_id).await?.ok_or_else(|| {
            warn!(
                project_id = %project.id,
                team_id = %project.team_id,
                "Project references a missing team"
            );
            ServiceError::NotFound("Team")
        })
    }

    /// Expands the team's member IDs into user summaries, in join order
    pub async fn team_roster(&self, team: &Team) -> ServiceResult<Vec<UserSummary>> {
        self.users_in_order(&team.members).await
    }

    /// Loads summaries for `ids`, preserving their order and skipping unknown users
    pub(crate) async fn users_in_order(&self, ids: &[Uuid]) -> ServiceResult<Vec<UserSummary>> {
        let mut by_id: HashMap<Uuid, UserSummary> = self
            .store
            .find_users(ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        let mut ordered = Vec::with_capacity(ids.len());
        for id in ids {
            match by_id.remove(id) {
                Some(user) => ordered.push(user),
                None => warn!(user_id = %id, "Reference to a missing user"),
            }
        }
        Ok(ordered)
    }
}
