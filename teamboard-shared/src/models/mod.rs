/// Domain models and their PostgreSQL operations
///
/// # Models
///
/// - `user`: accounts and global roles
/// - `team`: teams and their append-only member sets
/// - `project`: projects owned by a team
/// - `task`: tasks inside a project, with status and assignees
/// - `activity_log`: append-only audit entries
///
/// The SQL lives next to each model (`Model::create(&pool, ..)`). Services
/// never call these directly; they go through [`crate::store::Store`].

pub mod activity_log;
pub mod project;
pub mod task;
pub mod team;
pub mod user;
