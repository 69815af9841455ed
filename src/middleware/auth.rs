// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer-token authorization gate.

use crate::error::AppError;
use crate::models::User;
use crate::services::token::bearer_from_header;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// User resolved from the request's bearer token.
///
/// Read fresh from the store for every request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Middleware that requires a bearer token belonging to an existing user.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = resolve_user(&state, request.headers()).await?;

    tracing::debug!(user_id = %user.id, "Bearer token resolved");
    request.extensions_mut().insert(AuthUser(user));

    Ok(next.run(request).await)
}

/// Resolve the acting user, failing closed on anything but an exact match.
pub async fn resolve_user(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let token = bearer_token(headers)?;

    state
        .users
        .find_by_token(&token)
        .await?
        .ok_or_else(|| AppError::Unauthorized(AppError::TOKEN_INVALID.to_string()))
}

fn bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_from_header)
        .map(str::to_string)
        .ok_or_else(|| AppError::Unauthorized(AppError::TOKEN_REQUIRED.to_string()))
}
