// Shared helpers for router-level tests.
use crate::config::Config;
use crate::storage::seed::DEMO_PASSWORD;
use crate::{build_router, AppState};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const ONLINE_AGENT: &str = "agent1@company.com";
pub const OFFLINE_AGENT: &str = "agent2@company.com";
/// bcrypt's floor; keeps seeding fast.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_config() -> Config {
    Config {
        jwt_secret: "test-secret".to_string(),
        bcrypt_cost: TEST_BCRYPT_COST,
        ..Config::default()
    }
}

/// Seeded state: agent 1 online, agent 2 offline, default pre-chat form.
pub async fn test_app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::initialize(test_config()).await.unwrap());
    (build_router(state.clone()), state)
}

pub async fn send(
    app: &Router,
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
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

pub async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": DEMO_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

pub async fn create_conversation(app: &Router, name: &str, phone: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/conversations",
        None,
        Some(json!({ "customerName": name, "customerPhone": phone })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create conversation failed: {}", body);
    body
}
