/// Domain services
///
/// Each service takes the authenticated caller as an explicit argument,
/// resolves the ownership chain through [`ownership::OwnershipResolver`],
/// asks the authorization policy, performs the mutation through the
/// [`Store`](crate::store::Store) and records one activity entry on success.
///
/// Order of checks for every operation:
///
/// 1. resolve referenced entities (missing entity is [`ServiceError::NotFound`])
/// 2. authorize the caller ([`ServiceError::Denied`])
/// 3. validate input ([`ServiceError::Validation`])
/// 4. mutate, then record activity

use thiserror::Error;

use crate::auth::authorization::AuthzError;
use crate::store::StoreError;

pub mod activity;
pub mod ownership;
pub mod projects;
pub mod tasks;
pub mod teams;

pub use activity::ActivityRecorder;
pub use ownership::OwnershipResolver;
pub use projects::ProjectService;
pub use tasks::TaskService;
pub use teams::TeamService;

/// Service-level errors
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Referenced entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Authorization policy refused the caller
    #[error(transparent)]
    Denied(#[from] AuthzError),

    /// Input rejected
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Trims a required text field, rejecting blank values
pub(crate) fn required_text(field: &'static str, value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation {
            field,
            message: format!("{field} is required"),
        });
    }
    Ok(trimmed.to_string())
}
