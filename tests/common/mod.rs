#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use portfolio_api_rust::auth::{Identity, TokenIntrospector, UserInfo};
use portfolio_api_rust::config::AppConfig;
use portfolio_api_rust::error::AuthError;
use portfolio_api_rust::{app, AppState};

pub const VALID_TOKEN: &str = "valid-oauth-token";
pub const ADMIN_TOKEN: &str = "admin-oauth-token";
pub const BROKEN_TOKEN: &str = "token-that-breaks-the-user-service";
pub const SHARED_SECRET: &str = "airflow-shared-secret";

/// Stands in for the user service: a fixed token -> user table.
pub struct StaticIntrospector {
    users: HashMap<String, UserInfo>,
}

impl StaticIntrospector {
    pub fn new() -> Self {
        let mut users = HashMap::new();
        users.insert(VALID_TOKEN.to_string(), user("ada", false));
        users.insert(ADMIN_TOKEN.to_string(), user("root", true));
        Self { users }
    }
}

fn user(name: &str, is_admin: bool) -> UserInfo {
    UserInfo {
        user_id: Uuid::new_v4(),
        email: format!("{}@example.com", name),
        username: name.to_string(),
        is_admin,
    }
}

#[async_trait]
impl TokenIntrospector for StaticIntrospector {
    async fn introspect(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        if token == BROKEN_TOKEN {
            return Err(AuthError::Upstream("connection reset by peer".to_string()));
        }
        Ok(self.users.get(token).map(|user| Identity::from_user("OAuth2", user)))
    }
}

pub fn test_config(shared_secret: Option<&str>) -> AppConfig {
    let mut config = AppConfig::development();
    config.trust.shared_secret = shared_secret.map(str::to_string);
    config
}

pub fn test_state(config: &AppConfig) -> AppState {
    AppState::with_introspector(config, Arc::new(StaticIntrospector::new()))
}

/// Router plus the state behind it, wired against the static introspector.
pub fn test_app(shared_secret: Option<&str>) -> (Router, AppState) {
    let config = test_config(shared_secret);
    let state = test_state(&config);
    (app(state.clone(), &config.security), state)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(router: &Router, request: Request<Body>) -> Result<TestResponse> {
    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok(TestResponse { status, headers, body })
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

pub fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .expect("request")
}
