/// In-memory store.
///
/// Mirrors the PostgreSQL adapter's observable behaviour: case-insensitive
/// unique emails, members in join order, cascading project deletes and
/// newest-first activity listings.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{
    activity_log::{ActivityLogEntry, EntityType, NewActivity},
    project::{CreateProject, Project, ProjectChanges},
    task::{CreateTask, Task, TaskChanges, TaskStatus},
    team::{CreateTeam, Team},
    user::{CreateUser, User, UserSummary},
};

/// Thread-safe in-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    teams: HashMap<Uuid, Team>,
    projects: HashMap<Uuid, Project>,
    tasks: HashMap<Uuid, Task>,
    // Insertion order doubles as the tie-breaker for equal timestamps
    activity: Vec<ActivityLogEntry>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<'a>(entries: impl DoubleEndedIterator<Item = &'a ActivityLogEntry>) -> Vec<ActivityLogEntry> {
    let mut listed: Vec<ActivityLogEntry> = entries.rev().cloned().collect();
    // Stable sort keeps later insertions ahead on equal timestamps
    listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    listed
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut state = self.state.write().await;

        let taken = state
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&data.email));
        if taken {
            return Err(StoreError::Conflict("Email already exists".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_users(&self, ids: &[Uuid]) -> StoreResult<Vec<UserSummary>> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.users.get(id))
            .map(User::summary)
            .collect())
    }

    async fn create_team(&self, data: CreateTeam) -> StoreResult<Team> {
        let team = Team {
            id: Uuid::new_v4(),
            name: data.name,
            created_by: data.created_by,
            members: vec![data.created_by],
            created_at: Utc::now(),
        };
        self.state.write().await.teams.insert(team.id, team.clone());
        Ok(team)
    }

    async fn find_team(&self, id: Uuid) -> StoreResult<Option<Team>> {
        Ok(self.state.read().await.teams.get(&id).cloned())
    }

    async fn add_team_member(&self, team_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let Some(team) = state.teams.get_mut(&team_id) else {
            return Ok(false);
        };

        if team.has_member(user_id) {
            return Ok(false);
        }
        team.members.push(user_id);
        Ok(true)
    }

    async fn list_teams_for_member(&self, user_id: Uuid) -> StoreResult<Vec<Team>> {
        let state = self.state.read().await;
        let mut teams: Vec<Team> = state
            .teams
            .values()
            .filter(|t| t.has_member(user_id))
            .cloned()
            .collect();
        teams.sort_by_key(|t| t.created_at);
        Ok(teams)
    }

    async fn create_project(&self, data: CreateProject) -> StoreResult<Project> {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            team_id: data.team_id,
            created_by: data.created_by,
            created_at: now,
            updated_at: now,
        };
        self.state
            .write()
            .await
            .projects
            .insert(project.id, project.clone());
        Ok(project)
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(self.state.read().await.projects.get(&id).cloned())
    }

    async fn list_projects(&self, team_id: Uuid) -> StoreResult<Vec<Project>> {
        let state = self.state.read().await;
        let mut projects: Vec<Project> = state
            .projects
            .values()
            .filter(|p| p.team_id == team_id)
            .cloned()
            .collect();
        projects.sort_by_key(|p| p.created_at);
        Ok(projects)
    }

    async fn update_project(&self, id: Uuid, changes: &ProjectChanges) -> StoreResult<Option<Project>> {
        let mut state = self.state.write().await;
        Ok(state.projects.get_mut(&id).map(|project| {
            changes.apply(project);
            project.updated_at = Utc::now();
            project.clone()
        }))
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if state.projects.remove(&id).is_none() {
            return Ok(false);
        }
        state.tasks.retain(|_, task| task.project_id != id);
        Ok(true)
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            status: TaskStatus::Todo,
            project_id: data.project_id,
            assigned_to: data.assigned_to,
            created_by: data.created_by,
            created_at: now,
            updated_at: now,
        };
        self.state.write().await.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(self.state.read().await.tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, project_id: Uuid) -> StoreResult<Vec<Task>> {
        let state = self.state.read().await;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.created_at);
        Ok(tasks)
    }

    async fn update_task(&self, id: Uuid, changes: &TaskChanges) -> StoreResult<Option<Task>> {
        let mut state = self.state.write().await;
        Ok(state.tasks.get_mut(&id).map(|task| {
            changes.apply(task);
            task.updated_at = Utc::now();
            task.clone()
        }))
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.state.write().await.tasks.remove(&id).is_some())
    }

    async fn append_activity(&self, data: NewActivity) -> StoreResult<ActivityLogEntry> {
        let mut state = self.state.write().await;

        // Never let a later entry carry an earlier timestamp
        let now = Utc::now();
        let created_at = match state.activity.last() {
            Some(last) if last.created_at > now => last.created_at,
            _ => now,
        };

        let entry = ActivityLogEntry {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            action: data.action,
            entity_type: data.entity_type,
            entity_id: data.entity_id,
            description: data.description,
            created_at,
        };
        state.activity.push(entry.clone());
        Ok(entry)
    }

    async fn list_activity(&self) -> StoreResult<Vec<ActivityLogEntry>> {
        let state = self.state.read().await;
        Ok(newest_first(state.activity.iter()))
    }

    async fn list_activity_for(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
    ) -> StoreResult<Vec<ActivityLogEntry>> {
        let state = self.state.read().await;
        Ok(newest_first(
            state
                .activity
                .iter()
                .filter(|e| e.entity_type == entity_type && e.entity_id == entity_id),
        ))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
