/// Task endpoints
///
/// | Method | Path | Rule |
/// |---|---|---|
/// | POST | `/api/tasks` | team member |
/// | GET | `/api/tasks/:project_id` | team member |
/// | PUT | `/api/tasks/:task_id` | creator, or Admin/ProjectManager in the team |
/// | DELETE | `/api/tasks/:task_id` | creator, or Admin/ProjectManager in the team |
/// | PATCH | `/api/tasks/:task_id/status` | team member |
///
/// Assignees must all belong to the project's team, otherwise the whole
/// request fails with `400 invalid_assignment`.

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
    models::task::{Task, TaskChanges, TaskDetails, TaskStatus},
    services::tasks::NewTask,
};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Task title must be 1 to 200 characters"))]
    pub title: String,

    pub description: Option<String>,

    pub project_id: Uuid,

    #[serde(default)]
    pub assigned_to: Vec<Uuid>,
}

/// Partial edit; omitted fields stay unchanged, empty ones clear
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Task title must be 1 to 200 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,

    pub assigned_to: Option<Vec<Uuid>>,

    pub status: Option<TaskStatus>,
}

impl From<UpdateTaskRequest> for TaskChanges {
    fn from(req: UpdateTaskRequest) -> Self {
        TaskChanges {
            title: req.title,
            description: req.description,
            assigned_to: req.assigned_to,
            status: req.status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: TaskStatus,
}

pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> ApiResult<ApiResponse<Task>> {
    req.validate()?;

    let task = state
        .tasks
        .create_task(
            &auth,
            NewTask {
                title: req.title,
                description: req.description,
                project_id: req.project_id,
                assigned_to: req.assigned_to,
            },
        )
        .await?;

    Ok(ApiResponse::created("Task created successfully", task))
}

/// Tasks with assignees and creator populated
pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<String>,
) -> ApiResult<ApiResponse<Vec<TaskDetails>>> {
    let project_id = parse_id("project_id", &project_id)?;
    let tasks = state.tasks.list_tasks(&auth, project_id).await?;

    Ok(ApiResponse::ok("Tasks fetched successfully", tasks))
}

pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<String>,
    ApiJson(req): ApiJson<UpdateTaskRequest>,
) -> ApiResult<ApiResponse<Task>> {
    req.validate()?;
    let task_id = parse_id("task_id", &task_id)?;
    let task = state.tasks.update_task(&auth, task_id, req.into()).await?;

    Ok(ApiResponse::ok("Task updated successfully", task))
}

pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<String>,
    ApiJson(req): ApiJson<UpdateStatusRequest>,
) -> ApiResult<ApiResponse<Task>> {
    let task_id = parse_id("task_id", &task_id)?;
    let task = state.tasks.update_status(&auth, task_id, req.status).await?;

    Ok(ApiResponse::ok("Task status updated successfully", task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    let task_id = parse_id("task_id", &task_id)?;
    state.tasks.delete_task(&auth, task_id).await?;

    Ok(ApiResponse::message("Task deleted successfully"))
}
