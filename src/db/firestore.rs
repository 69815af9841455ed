// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Document store handle with typed user operations.
//!
//! The users collection can live in Firestore, in process memory, or
//! nowhere at all (offline mock, every call fails). Callers only see
//! `User` values and field-masked updates.

use crate::db::memory::MemoryCollection;
use crate::error::AppError;
use crate::models::User;
use serde::{de::DeserializeOwned, Serialize};

enum Backend {
    Firestore(firestore::FirestoreDb),
    Memory(MemoryCollection),
    Offline,
}

/// Document store client.
#[derive(Clone)]
pub struct FirestoreDb {
    backend: std::sync::Arc<Backend>,
    users_collection: String,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str, users_collection: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id, users_collection).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self::with_backend(Backend::Firestore(client), users_collection))
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(
        project_id: &str,
        users_collection: &str,
    ) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self::with_backend(Backend::Firestore(client), users_collection))
    }

    /// Create a store that keeps documents in process memory.
    pub fn new_in_memory(users_collection: &str) -> Self {
        Self::with_backend(Backend::Memory(MemoryCollection::new()), users_collection)
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self::with_backend(Backend::Offline, "users")
    }

    fn with_backend(backend: Backend, users_collection: &str) -> Self {
        Self {
            backend: std::sync::Arc::new(backend),
            users_collection: users_collection.to_string(),
        }
    }

    fn offline() -> AppError {
        AppError::Database("Database not connected (offline mode)".to_string())
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Every user document.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        match self.backend.as_ref() {
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .from(self.users_collection.as_str())
                .obj()
                .query()
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(col) => col.all(),
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Get a user by document ID.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        match self.backend.as_ref() {
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .by_id_in(self.users_collection.as_str())
                .obj()
                .one(id)
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(col) => col.get(id),
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Users whose string `field` equals `value`.
    pub async fn find_users_by_field(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Vec<User>, AppError> {
        match self.backend.as_ref() {
            Backend::Firestore(client) => {
                let field = field.to_string();
                let value = value.to_string();
                client
                    .fluent()
                    .select()
                    .from(self.users_collection.as_str())
                    .filter(move |q| q.for_all([q.field(field.as_str()).eq(value.as_str())]))
                    .obj()
                    .query()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            Backend::Memory(col) => {
                let found = col.find_eq(field, value);
                // Queries suspend on Firestore; do the same so callers interleave.
                tokio::task::yield_now().await;
                found
            }
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Store a new user and return it with its store-assigned ID.
    pub async fn add_user(&self, user: &User) -> Result<User, AppError> {
        match self.backend.as_ref() {
            Backend::Firestore(client) => client
                .fluent()
                .insert()
                .into(self.users_collection.as_str())
                .generate_document_id()
                .object(user)
                .execute()
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(col) => {
                let id = col.insert(user)?;
                Ok(User {
                    id,
                    ..user.clone()
                })
            }
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Overwrite the named fields of a user document, leaving the rest.
    pub async fn update_user_fields<T>(
        &self,
        id: &str,
        fields: &[&str],
        doc: &T,
    ) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        match self.backend.as_ref() {
            Backend::Firestore(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .fields(fields.iter().copied())
                    .in_col(self.users_collection.as_str())
                    .document_id(id)
                    .object(doc)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(col) => col.update_fields(id, fields, doc),
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Delete a user document.
    pub async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        match self.backend.as_ref() {
            Backend::Firestore(client) => {
                client
                    .fluent()
                    .delete()
                    .from(self.users_collection.as_str())
                    .document_id(id)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(col) => {
                if !col.remove(id) {
                    tracing::debug!(user_id = id, "Delete of missing document");
                }
                Ok(())
            }
            Backend::Offline => Err(Self::offline()),
        }
    }
}
