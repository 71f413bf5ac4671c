/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength rules
/// - [`jwt`]: access token generation and validation
/// - [`middleware`]: Axum bearer-token middleware and the [`middleware::AuthContext`] extractor
/// - [`authorization`]: the capability policy every service consults
///
/// # Example
///
/// ```no_run
/// use teamboard_shared::auth::password::{hash_password, verify_password};
/// use teamboard_shared::auth::jwt::{create_token, validate_token, Claims};
/// use teamboard_shared::models::user::UserRole;
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("MyP@ssw0rd!")?;
/// assert!(verify_password("MyP@ssw0rd!", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), "Ada", UserRole::Member, Duration::hours(24));
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
