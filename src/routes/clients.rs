// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client routes for the bearer-token owner.
//! The auth middleware is applied in routes/mod.rs for these routes.

use crate::error::{JsonBody, Result};
use crate::middleware::AuthUser;
use crate::models::client::{ClientPatch, ClientPayload};
use crate::models::Client;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/clients", get(list_clients).post(create_client))
        .route(
            "/api/clients/{id}",
            get(get_client)
                .put(replace_client)
                .patch(patch_client)
                .delete(delete_client),
        )
}

async fn list_clients(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> Json<Vec<Client>> {
    Json(state.clients.list(&user))
}

async fn get_client(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Client>> {
    Ok(Json(state.clients.get(&user, &id)?))
}

async fn create_client(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    JsonBody(payload): JsonBody<ClientPayload>,
) -> Result<(StatusCode, Json<Client>)> {
    let client = state.clients.create(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

async fn replace_client(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<ClientPayload>,
) -> Result<Json<Client>> {
    Ok(Json(state.clients.replace(&user, &id, payload).await?))
}

async fn patch_client(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<ClientPatch>,
) -> Result<Json<Client>> {
    Ok(Json(state.clients.patch(&user, &id, patch).await?))
}

async fn delete_client(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Client>> {
    Ok(Json(state.clients.delete(&user, &id).await?))
}
