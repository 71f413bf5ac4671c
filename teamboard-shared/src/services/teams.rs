/// Team membership.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::{required_text, ActivityRecorder, OwnershipResolver, ServiceResult};
use crate::auth::authorization::{authorize, Capability, Scope};
use crate::auth::middleware::AuthContext;
use crate::models::activity_log::ActivityAction;
use crate::models::team::{CreateTeam, Team, TeamRoster};
use crate::store::Store;

#[derive(Clone)]
pub struct TeamService {
    store: Arc<dyn Store>,
    resolver: OwnershipResolver,
    activity: ActivityRecorder,
}

impl TeamService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            resolver: OwnershipResolver::new(store.clone()),
            activity: ActivityRecorder::new(store.clone()),
            store,
        }
    }

    /// Creates a team with the caller as its only member
    pub async fn create_team(&self, caller: &AuthContext, name: &str) -> ServiceResult<Team> {
        authorize(caller, Capability::CreateTeam, Scope::Global)?;
        let name = required_text("name", name)?;

        let team = self
            .store
            .create_team(CreateTeam {
                name,
                created_by: caller.user_id,
            })
            .await?;

        info!(team_id = %team.id, user_id = %caller.user_id, "Team created");
        self.activity
            .record(
                caller.user_id,
                ActivityAction::CreateTeam,
                team.id,
                format!("{} created team \"{}\"", caller.name, team.name),
            )
            .await;

        Ok(team)
    }

    /// Adds the caller to a team
    ///
    /// Joining a team twice leaves membership unchanged and records nothing
    /// the second time.
    pub async fn join_team(&self, caller: &AuthContext, team_id: Uuid) -> ServiceResult<Team> {
        let team = self.resolver.resolve_team(team_id).await?;
        authorize(caller, Capability::JoinTeam, Scope::Team(&team))?;

        if !self.store.add_team_member(team.id, caller.user_id).await? {
            return Ok(team);
        }

        info!(%team_id, user_id = %caller.user_id, "Joined team");
        self.activity
            .record(
                caller.user_id,
                ActivityAction::JoinTeam,
                team.id,
                format!("{} joined team \"{}\"", caller.name, team.name),
            )
            .await;

        self.resolver.resolve_team(team_id).await
    }

    /// Teams the caller belongs to, with members populated
    pub async fn my_teams(&self, caller: &AuthContext) -> ServiceResult<Vec<TeamRoster>> {
        let teams = self.store.list_teams_for_member(caller.user_id).await?;

        let mut rosters = Vec::with_capacity(teams.len());
        for team in teams {
            let members = self.resolver.team_roster(&team).await?;
            rosters.push(TeamRoster {
                id: team.id,
                name: team.name,
                created_by: team.created_by,
                members,
                created_at: team.created_at,
            });
        }
        Ok(rosters)
    }
}
