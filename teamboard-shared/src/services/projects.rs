/// Projects within a team.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::{required_text, ActivityRecorder, OwnershipResolver, ServiceError, ServiceResult};
use crate::auth::authorization::{authorize, Capability, Scope};
use crate::auth::middleware::AuthContext;
use crate::models::activity_log::ActivityAction;
use crate::models::project::{CreateProject, Project, ProjectChanges};
use crate::store::Store;

/// Input for [`ProjectService::create_project`]
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub team_id: Uuid,
}

#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn Store>,
    resolver: OwnershipResolver,
    activity: ActivityRecorder,
}

impl ProjectService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            resolver: OwnershipResolver::new(store.clone()),
            activity: ActivityRecorder::new(store.clone()),
            store,
        }
    }

    pub async fn create_project(&self, caller: &AuthContext, input: NewProject) -> ServiceResult<Project> {
        let team = self.resolver.resolve_team(input.team_id).await?;
        authorize(caller, Capability::ManageProject, Scope::Team(&team))?;
        let name = required_text("name", &input.name)?;

        let project = self
            .store
            .create_project(CreateProject {
                name,
                description: input.description.unwrap_or_default(),
                team_id: team.id,
                created_by: caller.user_id,
            })
            .await?;

        info!(project_id = %project.id, team_id = %team.id, "Project created");
        self.activity
            .record(
                caller.user_id,
                ActivityAction::CreateProject,
                project.id,
                format!("{} created project \"{}\"", caller.name, project.name),
            )
            .await;

        Ok(project)
    }

    /// Projects of a team the caller belongs to
    pub async fn list_projects(&self, caller: &AuthContext, team_id: Uuid) -> ServiceResult<Vec<Project>> {
        let team = self.resolver.resolve_team(team_id).await?;
        authorize(caller, Capability::ViewTeam, Scope::Team(&team))?;

        Ok(self.store.list_projects(team.id).await?)
    }

    /// Applies partial changes; a present but blank name is rejected
    pub async fn update_project(
        &self,
        caller: &AuthContext,
        project_id: Uuid,
        mut changes: ProjectChanges,
    ) -> ServiceResult<Project> {
        let chain = self.resolver.resolve_project(project_id).await?;
        authorize(caller, Capability::ManageProject, Scope::Team(&chain.team))?;

        if let Some(name) = &changes.name {
            changes.name = Some(required_text("name", name)?);
        }

        let project = self
            .store
            .update_project(chain.project.id, &changes)
            .await?
            .ok_or(ServiceError::NotFound("Project"))?;

        info!(%project_id, user_id = %caller.user_id, "Project updated");
        self.activity
            .record(
                caller.user_id,
                ActivityAction::UpdateProject,
                project.id,
                format!("{} updated project \"{}\"", caller.name, project.name),
            )
            .await;

        Ok(project)
    }

    /// Deletes a project together with its tasks
    pub async fn delete_project(&self, caller: &AuthContext, project_id: Uuid) -> ServiceResult<()> {
        let chain = self.resolver.resolve_project(project_id).await?;
        authorize(caller, Capability::ManageProject, Scope::Team(&chain.team))?;

        if !self.store.delete_project(chain.project.id).await? {
            return Err(ServiceError::NotFound("Project"));
        }

        info!(%project_id, user_id = %caller.user_id, "Project deleted");
        self.activity
            .record(
                caller.user_id,
                ActivityAction::DeleteProject,
                project_id,
                format!("{} deleted project \"{}\"", caller.name, chain.project.name),
            )
            .await;

        Ok(())
    }
}
