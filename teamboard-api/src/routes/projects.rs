/// Project endpoints
///
/// Creating, updating and deleting require an Admin or ProjectManager who
/// belongs to the owning team; listing requires membership.

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{parse_id, ApiJson},
    response::ApiResponse,
};
use axum::extract::{Path, State};
use serde::Deserialize;
use teamboard_shared::{
    auth::middleware::AuthContext,
    models::project::{Project, ProjectChanges},
    services::projects::NewProject,
};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "Project name must be 1 to 200 characters"))]
    pub name: String,

    pub description: Option<String>,

    pub team_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "Project name must be 1 to 200 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,
}

impl From<UpdateProjectRequest> for ProjectChanges {
    fn from(req: UpdateProjectRequest) -> Self {
        ProjectChanges {
            name: req.name,
            description: req.description,
        }
    }
}

/// `POST /api/projects`
pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiJson(req): ApiJson<CreateProjectRequest>,
) -> ApiResult<ApiResponse<Project>> {
    req.validate()?;

    let project = state
        .projects
        .create_project(
            &auth,
            NewProject {
                name: req.name,
                description: req.description,
                team_id: req.team_id,
            },
        )
        .await?;

    Ok(ApiResponse::created("Project created successfully", project))
}

/// `GET /api/projects/:team_id`
pub async fn list_projects(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(team_id): Path<String>,
) -> ApiResult<ApiResponse<Vec<Project>>> {
    let team_id = parse_id("team_id", &team_id)?;
    let projects = state.projects.list_projects(&auth, team_id).await?;

    Ok(ApiResponse::ok("Projects fetched successfully", projects))
}

/// `PUT /api/projects/:project_id`
///
/// Omitted fields stay unchanged.
pub async fn update_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<String>,
    ApiJson(req): ApiJson<UpdateProjectRequest>,
) -> ApiResult<ApiResponse<Project>> {
    req.validate()?;
    let project_id = parse_id("project_id", &project_id)?;
    let project = state.projects.update_project(&auth, project_id, req.into()).await?;

    Ok(ApiResponse::ok("Project updated successfully", project))
}

/// `DELETE /api/projects/:project_id`
pub async fn delete_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    let project_id = parse_id("project_id", &project_id)?;
    state.projects.delete_project(&auth, project_id).await?;

    Ok(ApiResponse::message("Project deleted successfully"))
}
