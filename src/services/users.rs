// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User account lifecycle: create, read, full replace, partial patch, delete.
//!
//! Every payload is validated before the store is touched. The bearer token
//! is assigned once at creation and never written again.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::user::{fields, UserUpdate};
use crate::models::validation::UserPayload;
use crate::models::User;
use crate::services::locks::UserLocks;
use crate::services::token::generate_bearer_token;
use ring::rand::SystemRandom;

/// User account operations.
#[derive(Clone)]
pub struct UserService {
    db: FirestoreDb,
    locks: UserLocks,
    rng: SystemRandom,
}

impl UserService {
    pub fn new(db: FirestoreDb, locks: UserLocks) -> Self {
        Self {
            db,
            locks,
            rng: SystemRandom::new(),
        }
    }

    /// All users. An empty collection is reported as not found.
    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        let users = self.db.list_users().await?;
        if users.is_empty() {
            return Err(AppError::NotFound("no users registered".to_string()));
        }
        Ok(users)
    }

    pub async fn get(&self, id: &str) -> Result<User, AppError> {
        self.db
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))
    }

    /// Resolve a bearer token to its owning user.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<User>, AppError> {
        let mut users = self
            .db
            .find_users_by_field(fields::BEARER_TOKEN, token)
            .await?;
        if users.len() > 1 {
            tracing::warn!(count = users.len(), "Bearer token shared by several users");
        }
        Ok(users.pop())
    }

    /// Create a user with a fresh bearer token and no clients.
    pub async fn create(&self, payload: UserPayload) -> Result<User, AppError> {
        let new_user = payload.into_new_user()?;

        let _claim = self.locks.lock_email(&new_user.email).await;
        self.ensure_email_free(&new_user.email, None).await?;

        let user = User {
            id: String::new(),
            name: new_user.name,
            email: new_user.email,
            password: new_user.password,
            bearer_token: generate_bearer_token(&self.rng)?,
            clientes: Vec::new(),
        };

        let created = self.db.add_user(&user).await?;
        tracing::info!(user_id = %created.id, "User created");
        Ok(created)
    }

    /// Overwrite name, email and password. The token and clients are kept.
    pub async fn replace(&self, id: &str, payload: UserPayload) -> Result<User, AppError> {
        let update = payload.into_replacement()?;
        self.apply(id, update).await
    }

    /// Overwrite only the supplied fields.
    pub async fn patch(&self, id: &str, payload: UserPayload) -> Result<User, AppError> {
        let update = payload.into_patch()?;
        self.apply(id, update).await
    }

    /// Remove a user and its clients. A missing id is a bad request.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let _guard = self.locks.lock(id).await;

        if self.db.get_user(id).await?.is_none() {
            return Err(AppError::BadRequest("could not delete user".to_string()));
        }

        self.db.delete_user(id).await?;
        self.locks.forget(id);
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn apply(&self, id: &str, update: UserUpdate) -> Result<User, AppError> {
        let _guard = self.locks.lock(id).await;

        let mut user = self.get(id).await?;

        let _claim = match &update.email {
            Some(email) => {
                let claim = self.locks.lock_email(email).await;
                self.ensure_email_free(email, Some(id)).await?;
                Some(claim)
            }
            None => None,
        };

        self.db
            .update_user_fields(id, &update.field_names(), &update)
            .await?;

        update.apply_to(&mut user);
        tracing::info!(user_id = id, fields = ?update.field_names(), "User updated");
        Ok(user)
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<&str>) -> Result<(), AppError> {
        let taken = self
            .db
            .find_users_by_field(fields::EMAIL, email)
            .await?
            .into_iter()
            .any(|u| Some(u.id.as_str()) != owner);

        if taken {
            return Err(AppError::BadRequest(
                "a user with this email already exists".to_string(),
            ));
        }
        Ok(())
    }
}
