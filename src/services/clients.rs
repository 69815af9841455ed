// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client sub-collection manager.
//!
//! Clients live in the owning user's `clientes` array. Every mutation loads
//! the owner, edits the list in memory and writes the whole list back. The
//! cycle runs under the owner's lock so concurrent writers cannot drop each
//! other's changes.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::client::{Client, ClientPatch, ClientPayload};
use crate::models::user::UserUpdate;
use crate::models::validation::{describe_errors, is_blank};
use crate::models::User;
use crate::services::locks::UserLocks;
use crate::services::token::generate_client_id;
use validator::Validate;

/// Operations on a user's clients.
#[derive(Clone)]
pub struct ClientService {
    db: FirestoreDb,
    locks: UserLocks,
}

fn client_not_found() -> AppError {
    AppError::NotFound("client not found".to_string())
}

fn validate_payload(payload: &ClientPayload) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|errors| AppError::BadRequest(describe_errors(&errors)))
}

impl ClientService {
    pub fn new(db: FirestoreDb, locks: UserLocks) -> Self {
        Self { db, locks }
    }

    /// The owner's clients; an empty list is a valid answer.
    pub fn list(&self, owner: &User) -> Vec<Client> {
        owner.clientes.clone()
    }

    pub fn get(&self, owner: &User, client_id: &str) -> Result<Client, AppError> {
        owner
            .clientes
            .iter()
            .find(|c| c.id == client_id)
            .cloned()
            .ok_or_else(client_not_found)
    }

    /// Append a new client with a generated id.
    pub async fn create(&self, owner: &User, payload: ClientPayload) -> Result<Client, AppError> {
        validate_payload(&payload)?;

        let client = payload.into_client(generate_client_id());
        let created = client.clone();

        self.mutate(owner, move |clientes| {
            clientes.push(client);
            Ok(())
        })
        .await?;

        tracing::info!(user_id = %owner.id, client_id = %created.id, "Client created");
        Ok(created)
    }

    /// Replace a client wholesale, keeping its id.
    pub async fn replace(
        &self,
        owner: &User,
        client_id: &str,
        payload: ClientPayload,
    ) -> Result<Client, AppError> {
        validate_payload(&payload)?;

        let replacement = payload.into_client(client_id.to_string());
        let updated = replacement.clone();

        self.mutate(owner, move |clientes| {
            let slot = clientes
                .iter_mut()
                .find(|c| c.id == replacement.id)
                .ok_or_else(client_not_found)?;
            *slot = replacement;
            Ok(())
        })
        .await?;

        tracing::info!(user_id = %owner.id, client_id, "Client replaced");
        Ok(updated)
    }

    /// Merge supplied fields into a client. Address keys merge into the
    /// existing address instead of replacing it.
    pub async fn patch(
        &self,
        owner: &User,
        client_id: &str,
        patch: ClientPatch,
    ) -> Result<Client, AppError> {
        if patch.name.as_deref().is_some_and(is_blank) {
            return Err(AppError::BadRequest("name must not be empty".to_string()));
        }
        if patch.email.as_deref().is_some_and(is_blank) {
            return Err(AppError::BadRequest("email must not be empty".to_string()));
        }

        let mut updated = None;
        self.mutate(owner, |clientes| {
            let client = clientes
                .iter_mut()
                .find(|c| c.id == client_id)
                .ok_or_else(client_not_found)?;
            client.apply_patch(patch);
            updated = Some(client.clone());
            Ok(())
        })
        .await?;

        tracing::info!(user_id = %owner.id, client_id, "Client patched");
        updated.ok_or_else(client_not_found)
    }

    /// Remove a client and return it.
    pub async fn delete(&self, owner: &User, client_id: &str) -> Result<Client, AppError> {
        let mut removed = None;
        self.mutate(owner, |clientes| {
            let before = clientes.len();
            let mut kept = Vec::with_capacity(before);
            for client in clientes.drain(..) {
                if client.id == client_id {
                    removed = Some(client);
                } else {
                    kept.push(client);
                }
            }
            *clientes = kept;

            if clientes.len() == before {
                return Err(client_not_found());
            }
            Ok(())
        })
        .await?;

        tracing::info!(user_id = %owner.id, client_id, "Client deleted");
        removed.ok_or_else(client_not_found)
    }

    /// Load the owner under its lock, edit the list, write the list back.
    ///
    /// Nothing is written if `edit` fails.
    async fn mutate<F>(&self, owner: &User, edit: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut Vec<Client>) -> Result<(), AppError>,
    {
        let _guard = self.locks.lock(&owner.id).await;

        let fresh = self
            .db
            .get_user(&owner.id)
            .await?
            .ok_or_else(|| AppError::Unauthorized(AppError::TOKEN_INVALID.to_string()))?;

        let mut clientes = fresh.clientes;
        edit(&mut clientes)?;

        let count = clientes.len();
        let update = UserUpdate {
            clientes: Some(clientes),
            ..Default::default()
        };
        self.db
            .update_user_fields(&owner.id, &update.field_names(), &update)
            .await?;

        tracing::debug!(user_id = %owner.id, count, "Client list written back");
        Ok(())
    }
}
