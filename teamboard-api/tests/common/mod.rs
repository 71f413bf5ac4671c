/// Common test utilities for integration tests
///
/// Builds the full router over an in-memory store and provides:
/// - Test user creation with ready-made JWT tokens
/// - A JSON request helper driving the router as a `tower::Service`

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::Duration;
use serde_json::Value;
use teamboard_api::app::{build_router, AppState};
use teamboard_api::config::Config;
use teamboard_shared::auth::jwt::{create_token, Claims};
use teamboard_shared::models::user::{CreateUser, UserRole};
use teamboard_shared::store::{MemoryStore, Store};
use tower::Service as _;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<dyn Store>,
    pub app: axum::Router,
    pub config: Config,
}

/// A stored user and a valid token for them
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub token: String,
}

impl TestContext {
    /// Creates a context with an empty store
    pub fn new() -> Self {
        Self::with_env(&[])
    }

    /// Creates a context with extra configuration variables
    pub fn with_env(vars: &[(&str, &str)]) -> Self {
        let config = Config::from_lookup(|key| match key {
            "JWT_SECRET" => Some(JWT_SECRET.to_string()),
            _ => vars
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string()),
        })
        .expect("test config");

        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let app = build_router(AppState::new(store.clone(), config.clone()));

        TestContext { store, app, config }
    }

    /// Stores a user directly, skipping password hashing
    pub async fn user(&self, name: &str, role: UserRole) -> TestUser {
        let user = self
            .store
            .create_user(CreateUser {
                name: name.to_string(),
                email: format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4()),
                password_hash: "not-used".to_string(),
                role,
            })
            .await
            .expect("create user");

        let claims = Claims::for_user(&user, Duration::hours(1));
        let token = create_token(&claims, &self.config.jwt.secret).expect("create token");

        TestUser {
            id: user.id,
            name: user.name,
            token,
        }
    }

    /// Sends a request and returns the status with the parsed JSON body
    ///
    /// An empty body parses as `Value::Null`.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self.app.clone().call(request).await.expect("call router");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("non-JSON body {}: {}", status, String::from_utf8_lossy(&bytes))
            })
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, user: &TestUser) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(&user.token), None).await
    }

    pub async fn post(&self, uri: &str, user: &TestUser, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(&user.token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, user: &TestUser, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(&user.token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, user: &TestUser, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(&user.token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, user: &TestUser) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(&user.token), None).await
    }
}

/// Reads `data.id` from a success envelope
pub fn data_id(body: &Value) -> String {
    body["data"]["id"]
        .as_str()
        .unwrap_or_else(|| panic!("missing data.id in {}", body))
        .to_string()
}
