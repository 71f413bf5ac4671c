/// Team endpoints
///
/// - `POST /api/teams` - Create a team (Admin and ProjectManager)
/// - `POST /api/teams/join` - Join a team by id
/// - `GET /api/teams/mine` - Teams the caller belongs to

use crate::{app::AppState, error::ApiResult, extract::ApiJson, response::ApiResponse};
use axum::extract::State;
use serde::Deserialize;
use teamboard_shared::{
    auth::middleware::AuthContext,
    models::team::{Team, TeamRoster},
};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 100, message = "Team name must be 1 to 100 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinTeamRequest {
    pub team_id: Uuid,
}

pub async fn create_team(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiJson(req): ApiJson<CreateTeamRequest>,
) -> ApiResult<ApiResponse<Team>> {
    req.validate()?;
    let team = state.teams.create_team(&auth, &req.name).await?;

    Ok(ApiResponse::created("Team created successfully", team))
}

/// Joining a team the caller already belongs to succeeds without changes
pub async fn join_team(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiJson(req): ApiJson<JoinTeamRequest>,
) -> ApiResult<ApiResponse<Team>> {
    let team = state.teams.join_team(&auth, req.team_id).await?;

    Ok(ApiResponse::ok("Joined team successfully", team))
}

pub async fn my_teams(State(state): State<AppState>, auth: AuthContext) -> ApiResult<ApiResponse<Vec<TeamRoster>>> {
    let teams = state.teams.my_teams(&auth).await?;

    Ok(ApiResponse::ok("Teams fetched successfully", teams))
}
