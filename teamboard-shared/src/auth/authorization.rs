/// Authorization policy
///
/// Every mutation and every scoped read asks [`authorize`] whether the caller
/// holds a [`Capability`] within a [`Scope`]. Decisions combine two inputs:
///
/// 1. **Global role**: Admin and ProjectManager are privileged, Member is not
/// 2. **Team membership**: read from the team record loaded for this request
///
/// The functions here are pure. Callers resolve the ownership chain first
/// (a missing entity is reported as not-found before any policy check) and
/// then hand the loaded team in.
///
/// # Example
///
/// ```
/// use teamboard_shared::auth::authorization::{authorize, Capability, Scope};
/// use teamboard_shared::auth::middleware::AuthContext;
/// use teamboard_shared::models::team::Team;
/// use teamboard_shared::models::user::UserRole;
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let lead = AuthContext::new(Uuid::new_v4(), "Lead", UserRole::ProjectManager);
/// let team = Team {
///     id: Uuid::new_v4(),
///     name: "Core".to_string(),
///     created_by: lead.user_id,
///     members: vec![lead.user_id],
///     created_at: Utc::now(),
/// };
///
/// assert!(authorize(&lead, Capability::ManageProject, Scope::Team(&team)).is_ok());
/// ```

use uuid::Uuid;

use super::middleware::AuthContext;
use crate::models::team::Team;
use crate::models::user::UserRole;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Caller's global role is too low
    #[error("Insufficient permissions: requires {required}, has {actual}")]
    InsufficientRole {
        required: &'static str,
        actual: UserRole,
    },

    /// Caller is not a member of the team
    #[error("Not a member of team {0}")]
    NotMember(Uuid),

    /// Caller may not act on this resource
    #[error("Not authorized to access this resource")]
    NotAuthorized,

    /// Some assignees are not members of the owning team
    #[error("Assignees must be members of the team")]
    InvalidAssignment(Vec<Uuid>),
}

/// Actions guarded by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    CreateTeam,
    JoinTeam,
    /// List a team's projects or a project's tasks
    ViewTeam,
    /// Create, update or delete a project
    ManageProject,
    CreateTask,
    EditTask,
    DeleteTask,
    ChangeTaskStatus,
}

/// What a capability is checked against
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    /// No owning resource
    Global,

    /// The owning team
    Team(&'a Team),

    /// A task, through its owning team
    Task { team: &'a Team, created_by: Uuid },
}

impl<'a> Scope<'a> {
    fn team(&self) -> Option<&'a Team> {
        match *self {
            Scope::Global => None,
            Scope::Team(team) | Scope::Task { team, .. } => Some(team),
        }
    }
}

const PRIVILEGED: &str = "Admin or ProjectManager";

/// Decides whether `caller` may exercise `capability` within `scope`
///
/// | Capability | Rule |
/// |---|---|
/// | `CreateTeam` | privileged role |
/// | `JoinTeam` | anyone authenticated |
/// | `ViewTeam`, `CreateTask`, `ChangeTaskStatus` | team member |
/// | `ManageProject` | privileged role and team member |
/// | `EditTask`, `DeleteTask` | task creator, or privileged role and team member |
///
/// A capability that needs a team but is given [`Scope::Global`] is denied.
pub fn authorize(caller: &AuthContext, capability: Capability, scope: Scope<'_>) -> Result<(), AuthzError> {
    let outcome = match capability {
        Capability::CreateTeam => require_privileged(caller),
        Capability::JoinTeam => Ok(()),
        Capability::ViewTeam | Capability::CreateTask | Capability::ChangeTaskStatus => {
            team_of(scope).and_then(|team| require_membership(caller, team))
        }
        Capability::ManageProject => team_of(scope).and_then(|team| {
            require_privileged(caller)?;
            require_membership(caller, team)
        }),
        Capability::EditTask | Capability::DeleteTask => match scope {
            Scope::Task { created_by, .. } if created_by == caller.user_id => Ok(()),
            Scope::Task { team, .. } => {
                if !caller.role.is_privileged() {
                    return deny(caller, capability, AuthzError::NotAuthorized);
                }
                require_membership(caller, team)
            }
            _ => Err(AuthzError::NotAuthorized),
        },
    };

    match outcome {
        Ok(()) => Ok(()),
        Err(err) => deny(caller, capability, err),
    }
}

/// Rejects the whole list if any assignee is not a current team member
///
/// The error carries every offending ID, in input order.
pub fn check_assignees(team: &Team, assignees: &[Uuid]) -> Result<(), AuthzError> {
    let outsiders: Vec<Uuid> = assignees
        .iter()
        .copied()
        .filter(|id| !team.has_member(*id))
        .collect();

    if outsiders.is_empty() {
        Ok(())
    } else {
        Err(AuthzError::InvalidAssignment(outsiders))
    }
}

fn team_of<'a>(scope: Scope<'a>) -> Result<&'a Team, AuthzError> {
    scope.team().ok_or(AuthzError::NotAuthorized)
}

fn require_privileged(caller: &AuthContext) -> Result<(), AuthzError> {
    if caller.role.is_privileged() {
        Ok(())
    } else {
        Err(AuthzError::InsufficientRole {
            required: PRIVILEGED,
            actual: caller.role,
        })
    }
}

fn require_membership(caller: &AuthContext, team: &Team) -> Result<(), AuthzError> {
    if team.has_member(caller.user_id) {
        Ok(())
    } else {
        Err(AuthzError::NotMember(team.id))
    }
}

fn deny(caller: &AuthContext, capability: Capability, err: AuthzError) -> Result<(), AuthzError> {
    tracing::debug!(
        user_id = %caller.user_id,
        role = %caller.role,
        ?capability,
        reason = %err,
        "Authorization denied"
    );
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn caller(role: UserRole) -> AuthContext {
        AuthContext::new(Uuid::new_v4(), "Caller", role)
    }

    fn team_of_members(members: &[Uuid]) -> Team {
        Team {
            id: Uuid::new_v4(),
            name: "Core".to_string(),
            created_by: members[0],
            members: members.to_vec(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_team_requires_privileged_role() {
        assert!(authorize(&caller(UserRole::Admin), Capability::CreateTeam, Scope::Global).is_ok());
        assert!(authorize(&caller(UserRole::ProjectManager), Capability::CreateTeam, Scope::Global).is_ok());
        assert_eq!(
            authorize(&caller(UserRole::Member), Capability::CreateTeam, Scope::Global),
            Err(AuthzError::InsufficientRole {
                required: PRIVILEGED,
                actual: UserRole::Member,
            })
        );
    }

    #[test]
    fn test_anyone_may_join() {
        assert!(authorize(&caller(UserRole::Member), Capability::JoinTeam, Scope::Global).is_ok());
    }

    #[test]
    fn test_membership_capabilities() {
        let member = caller(UserRole::Member);
        let outsider = caller(UserRole::Admin);
        let team = team_of_members(&[member.user_id]);

        for capability in [Capability::ViewTeam, Capability::CreateTask, Capability::ChangeTaskStatus] {
            assert!(authorize(&member, capability, Scope::Team(&team)).is_ok());
            assert_eq!(
                authorize(&outsider, capability, Scope::Team(&team)),
                Err(AuthzError::NotMember(team.id))
            );
            assert_eq!(
                authorize(&member, capability, Scope::Global),
                Err(AuthzError::NotAuthorized)
            );
        }
    }

    #[test]
    fn test_manage_project_needs_role_and_membership() {
        let lead = caller(UserRole::ProjectManager);
        let member = caller(UserRole::Member);
        let outside_admin = caller(UserRole::Admin);
        let team = team_of_members(&[lead.user_id, member.user_id]);

        assert!(authorize(&lead, Capability::ManageProject, Scope::Team(&team)).is_ok());
        assert!(matches!(
            authorize(&member, Capability::ManageProject, Scope::Team(&team)),
            Err(AuthzError::InsufficientRole { .. })
        ));
        assert_eq!(
            authorize(&outside_admin, Capability::ManageProject, Scope::Team(&team)),
            Err(AuthzError::NotMember(team.id))
        );
    }

    #[test]
    fn test_task_edit_and_delete_rules() {
        let creator = caller(UserRole::Member);
        let other_member = caller(UserRole::Member);
        let lead = caller(UserRole::ProjectManager);
        let outside_admin = caller(UserRole::Admin);
        let team = team_of_members(&[lead.user_id, creator.user_id, other_member.user_id]);
        let scope = Scope::Task {
            team: &team,
            created_by: creator.user_id,
        };

        for capability in [Capability::EditTask, Capability::DeleteTask] {
            assert!(authorize(&creator, capability, scope).is_ok());
            assert!(authorize(&lead, capability, scope).is_ok());
            assert_eq!(
                authorize(&other_member, capability, scope),
                Err(AuthzError::NotAuthorized)
            );
            assert_eq!(
                authorize(&outside_admin, capability, scope),
                Err(AuthzError::NotMember(team.id))
            );
            assert_eq!(
                authorize(&lead, capability, Scope::Team(&team)),
                Err(AuthzError::NotAuthorized)
            );
        }
    }

    #[test]
    fn test_check_assignees_rejects_whole_list() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let team = team_of_members(&[a, b]);

        assert!(check_assignees(&team, &[]).is_ok());
        assert!(check_assignees(&team, &[a, b]).is_ok());
        assert_eq!(
            check_assignees(&team, &[a, stranger, b]),
            Err(AuthzError::InvalidAssignment(vec![stranger]))
        );
    }

    #[test]
    fn test_authz_error_display() {
        let err = AuthzError::NotMember(Uuid::new_v4());
        assert!(err.to_string().contains("Not a member"));

        let err = AuthzError::InsufficientRole {
            required: PRIVILEGED,
            actual: UserRole::Member,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient permissions: requires Admin or ProjectManager, has Member"
        );
    }
}
