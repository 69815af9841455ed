// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User account routes (no authentication).

use crate::error::{JsonBody, Result};
use crate::models::user::CreatedUserResponse;
use crate::models::validation::UserPayload;
use crate::models::UserResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user)
                .put(replace_user)
                .patch(patch_user)
                .delete(delete_user),
        )
}

/// Response for user deletion.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    pub id: String,
    pub message: String,
}

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserResponse>>> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>> {
    Ok(Json(state.users.get(&id).await?.into()))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<UserPayload>,
) -> Result<(StatusCode, Json<CreatedUserResponse>)> {
    let user = state.users.create(payload).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

async fn replace_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UserPayload>,
) -> Result<Json<UserResponse>> {
    Ok(Json(state.users.replace(&id, payload).await?.into()))
}

async fn patch_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UserPayload>,
) -> Result<Json<UserResponse>> {
    Ok(Json(state.users.patch(&id, payload).await?.into()))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteUserResponse>> {
    state.users.delete(&id).await?;
    Ok(Json(DeleteUserResponse {
        id,
        message: "user deleted".to_string(),
    }))
}
