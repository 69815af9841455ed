// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Clientes API: users and the clients they own.
//!
//! Users are documents in a single collection; each user's clients live in
//! a nested `clientes` array and are reached through the owner's bearer token.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::{Config, StoreBackend};
use db::FirestoreDb;
use error::AppError;
use services::{ClientService, UserLocks, UserService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub users: UserService,
    pub clients: ClientService,
}

impl AppState {
    /// Wire services around an already-connected store.
    pub fn new(config: Config, db: FirestoreDb) -> Self {
        let locks = UserLocks::new();
        Self {
            users: UserService::new(db.clone(), locks.clone()),
            clients: ClientService::new(db.clone(), locks),
            config,
            db,
        }
    }

    /// Connect to the configured store backend and build the state.
    pub async fn connect(config: Config) -> Result<Self, AppError> {
        let db = match config.store_backend {
            StoreBackend::Firestore => {
                FirestoreDb::new(&config.gcp_project_id, &config.users_collection).await?
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on restart");
                FirestoreDb::new_in_memory(&config.users_collection)
            }
        };
        Ok(Self::new(config, db))
    }
}
