// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error mapping: status codes and JSON bodies.

use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use clientes_api::error::AppError;

mod common;
use common::{create_offline_app, send};

#[test]
fn test_status_mapping() {
    assert_eq!(
        AppError::Unauthorized("x".to_string()).status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        AppError::BadRequest("x".to_string()).status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AppError::NotFound("x".to_string()).status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        AppError::Database("x".to_string()).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        AppError::Internal(anyhow::anyhow!("x")).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_database_error_body_is_generic() {
    let response = AppError::Database("connection string with secrets".to_string()).into_response();
    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body, serde_json::json!({ "message": "internal server error" }));
}

#[tokio::test]
async fn test_store_failure_maps_to_500() {
    let app = create_offline_app();

    let (status, body) = send(&app, Method::GET, "/api/users", None, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].is_string());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/users",
        None,
        Some(serde_json::json!({ "name": "Ana", "email": "ana@x.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // Token lookup hits the store too
    let (status, _) = send(&app, Method::GET, "/api/clients", Some("abc"), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_validation_precedes_store_access() {
    let app = create_offline_app();

    // Would be a 500 if the store were consulted first
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/users",
        None,
        Some(serde_json::json!({ "name": "Ana", "email": "bad", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/users/any",
        None,
        Some(serde_json::json!({ "password": "123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _) = common::create_test_app();

    let response = tower::ServiceExt::oneshot(
        app,
        axum::http::Request::builder()
            .method("POST")
            .uri("/api/users")
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
