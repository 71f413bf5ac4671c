/// Activity log endpoints
///
/// - `GET /api/activity` - Every entry, newest first
/// - `GET /api/activity/:entity_type/:entity_id` - One entity's entries
///
/// `entity_type` is `team`, `project` or `task`, in any case.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::parse_id,
    response::ApiResponse,
};
use axum::extract::{Path, State};
use teamboard_shared::{
    auth::middleware::AuthContext,
    models::activity_log::{ActivityRecord, EntityType},
};

fn parse_entity_type(raw: &str) -> ApiResult<EntityType> {
    match raw.to_ascii_lowercase().as_str() {
        "team" => Ok(EntityType::Team),
        "project" => Ok(EntityType::Project),
        "task" => Ok(EntityType::Task),
        _ => Err(ApiError::invalid(
            "entity_type",
            "entity_type must be one of team, project, task",
        )),
    }
}

pub async fn list_all(State(state): State<AppState>, _auth: AuthContext) -> ApiResult<ApiResponse<Vec<ActivityRecord>>> {
    let logs = state.activity.list_all().await?;

    Ok(ApiResponse::ok("Activity logs fetched successfully", logs))
}

pub async fn list_by_entity(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path((entity_type, entity_id)): Path<(String, String)>,
) -> ApiResult<ApiResponse<Vec<ActivityRecord>>> {
    let entity_type = parse_entity_type(&entity_type)?;
    let entity_id = parse_id("entity_id", &entity_id)?;
    let logs = state.activity.list_by_entity(entity_type, entity_id).await?;

    Ok(ApiResponse::ok("Activity logs fetched successfully", logs))
}
