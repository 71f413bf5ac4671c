/// API route handlers
///
/// Handlers are thin: they parse the request, call a service with the
/// authenticated caller and wrap the result in [`crate::response::ApiResponse`].
///
/// - `health`: Health check endpoint
/// - `auth`: Signup, login and current user
/// - `teams`: Team creation, joining and listing
/// - `projects`: Project CRUD within a team
/// - `tasks`: Task CRUD and status changes
/// - `activity`: Audit log queries

pub mod activity;
pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod teams;
