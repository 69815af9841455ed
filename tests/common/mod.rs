// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use clientes_api::config::Config;
use clientes_api::db::FirestoreDb;
use clientes_api::routes::create_router;
use clientes_api::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection against the emulator.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project", "users")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app backed by the in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = FirestoreDb::new_in_memory(&config.users_collection);
    let state = Arc::new(AppState::new(config, db));
    (create_router(state.clone()), state)
}

/// Create a test app whose store is offline (every call fails).
#[allow(dead_code)]
pub fn create_offline_app() -> Router {
    let state = Arc::new(AppState::new(Config::test_default(), FirestoreDb::new_mock()));
    create_router(state)
}

/// Send a request and return the status and decoded JSON body.
#[allow(dead_code)]
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
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Create a user through the API and return `(id, bearer_token)`.
#[allow(dead_code)]
pub async fn create_user(app: &Router, name: &str, email: &str) -> (String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/users",
        None,
        Some(serde_json::json!({ "name": name, "email": email, "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create user failed: {body}");
    (
        body["id"].as_str().unwrap().to_string(),
        body["bearerToken"].as_str().unwrap().to_string(),
    )
}

/// A valid client payload.
#[allow(dead_code)]
pub fn client_body(name: &str) -> Value {
    serde_json::json!({
        "name": name,
        "email": format!("{}@x.com", name.to_lowercase()),
        "address": { "city": "A", "country": "B", "municipality": "C", "state": "D" }
    })
}
