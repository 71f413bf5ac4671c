//! # Teamboard Shared Library
//!
//! Domain types and business rules used by the Teamboard API server.
//!
//! ## Module Organization
//!
//! - `models`: users, teams, projects, tasks and activity entries, with their SQL
//! - `store`: persistence port with PostgreSQL and in-memory adapters
//! - `db`: connection pool and migrations for the PostgreSQL store
//! - `auth`: password hashing, JWT, Axum middleware and the authorization policy
//! - `services`: ownership resolution, task lifecycle, team and project rules, activity log

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the Teamboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
