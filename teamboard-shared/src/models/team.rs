/// Team model and membership operations
///
/// A team owns its member set. Membership only grows: there is a join
/// operation and no leave or remove operation.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     created_by UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE team_members (
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (team_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::UserSummary;

/// Team with its current member IDs (join order)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    /// Team ID
    pub id: Uuid,

    /// Team name
    pub name: String,

    /// User who created the team
    pub created_by: Uuid,

    /// Member user IDs, creator first
    pub members: Vec<Uuid>,

    /// When the team was created
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Checks whether a user currently belongs to the team
    pub fn has_member(&self, user_id: Uuid) -> bool {
        self.members.contains(&user_id)
    }
}

/// Team with members expanded to user records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRoster {
    /// Team ID
    pub id: Uuid,

    /// Team name
    pub name: String,

    /// User who created the team
    pub created_by: Uuid,

    /// Populated members
    pub members: Vec<UserSummary>,

    /// When the team was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeam {
    /// Team name
    pub name: String,

    /// Creator, inserted as the first member
    pub created_by: Uuid,
}

const TEAM_COLUMNS: &str = r#"
    t.id, t.name, t.created_by, t.created_at,
    COALESCE(
        array_agg(m.user_id ORDER BY m.joined_at, m.user_id) FILTER (WHERE m.user_id IS NOT NULL),
        '{}'::uuid[]
    ) AS members
"#;

impl Team {
    /// Creates a team and enrolls the creator in one transaction
    pub async fn create(pool: &PgPool, data: CreateTeam) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (id, created_at): (Uuid, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO teams (name, created_by)
            VALUES ($1, $2)
            RETURNING id, created_at
            "#,
        )
        .bind(&data.name)
        .bind(data.created_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO team_members (team_id, user_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(id)
        .bind(data.created_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Self {
            id,
            name: data.name,
            created_by: data.created_by,
            members: vec![data.created_by],
            created_at,
        })
    }

    /// Finds a team by ID with its current members
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {TEAM_COLUMNS}
            FROM teams t
            LEFT JOIN team_members m ON m.team_id = t.id
            WHERE t.id = $1
            GROUP BY t.id
            "#
        );

        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Adds a member
    ///
    /// Returns `true` when the user was added, `false` when they were
    /// already a member.
    pub async fn add_member(pool: &PgPool, team_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO team_members (team_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (team_id, user_id) DO NOTHING
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists teams the user belongs to, oldest first
    pub async fn list_by_member(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {TEAM_COLUMNS}
            FROM teams t
            LEFT JOIN team_members m ON m.team_id = t.id
            WHERE t.id IN (SELECT team_id FROM team_members WHERE user_id = $1)
            GROUP BY t.id
            ORDER BY t.created_at ASC
            "#
        );

        sqlx::query_as::<_, Team>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
