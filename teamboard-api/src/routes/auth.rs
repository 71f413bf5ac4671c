/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/signup` - Create an account and get a token
/// - `POST /api/auth/login` - Exchange credentials for a token
/// - `GET /api/auth/me` - Current user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    response::ApiResponse,
};
use axum::extract::State;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use teamboard_shared::{
    auth::{
        jwt::{self, Claims},
        middleware::AuthContext,
        password,
    },
    models::user::{CreateUser, User, UserRole, UserSummary},
};
use validator::Validate;

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (will be validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Requested role; `Member` when omitted
    ///
    /// Privileged roles are refused unless `SIGNUP_ALLOW_PRIVILEGED_ROLES` is on.
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token plus the account it was issued for
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    /// Bearer token
    pub token: String,

    /// Authenticated user
    pub user: UserSummary,
}

fn issue_token(state: &AppState, user: &User) -> ApiResult<AuthPayload> {
    let claims = Claims::for_user(user, Duration::hours(state.config.jwt.expiry_hours));
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(AuthPayload {
        token,
        user: user.summary(),
    })
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/signup
/// Content-Type: application/json
///
/// {
///   "name": "Ada",
///   "email": "ada@example.com",
///   "password": "SecureP@ss123",
///   "role": "ProjectManager"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or weak password
/// - `403 Forbidden`: Privileged role requested while disabled
/// - `409 Conflict`: Email already exists
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> ApiResult<ApiResponse<AuthPayload>> {
    req.validate()?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::invalid("name", "Name is required"));
    }

    let role = req.role.unwrap_or_default();
    if role.is_privileged() && !state.config.signup.allow_privileged_roles {
        return Err(ApiError::Forbidden(format!("Role {} cannot be chosen at signup", role)));
    }

    password::validate_password_strength(&req.password)?;
    let password_hash = password::hash_password(&req.password)?;

    let user = state
        .store
        .create_user(CreateUser {
            name: name.to_string(),
            email: req.email.trim().to_string(),
            password_hash,
            role,
        })
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "User signed up");

    Ok(ApiResponse::created("User registered successfully", issue_token(&state, &user)?))
}

/// Login endpoint
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Invalid credentials
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<ApiResponse<AuthPayload>> {
    req.validate()?;

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = state
        .store
        .find_user_by_email(req.email.trim())
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Rejected login");
        return Err(invalid());
    }

    Ok(ApiResponse::ok("Login successful", issue_token(&state, &user)?))
}

/// Current user
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: Account no longer exists
pub async fn me(State(state): State<AppState>, auth: AuthContext) -> ApiResult<ApiResponse<UserSummary>> {
    let user = state
        .store
        .find_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::ok("User fetched successfully", user.summary()))
}
