// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use super::client::Client;
use serde::{Deserialize, Serialize};

/// User document stored in the users collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned document ID (never written into the document body)
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    pub name: String,
    /// Unique across users
    pub email: String,
    /// Stored as supplied (no hashing)
    pub password: String,
    /// Authorization credential for client operations, never reassigned
    pub bearer_token: String,
    /// Clients owned by this user, in insertion order
    #[serde(default)]
    pub clientes: Vec<Client>,
}

/// Document field names, as stored.
pub mod fields {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
    pub const BEARER_TOKEN: &str = "bearerToken";
    pub const CLIENTES: &str = "clientes";
}

/// Partial user document for field-masked writes.
///
/// Only `Some` fields serialize; callers pass the matching field names
/// to the store so nothing else is touched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clientes: Option<Vec<Client>>,
}

impl UserUpdate {
    /// Names of the fields this update writes.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.name.is_some() {
            names.push(fields::NAME);
        }
        if self.email.is_some() {
            names.push(fields::EMAIL);
        }
        if self.password.is_some() {
            names.push(fields::PASSWORD);
        }
        if self.clientes.is_some() {
            names.push(fields::CLIENTES);
        }
        names
    }

    pub fn is_empty(&self) -> bool {
        self.field_names().is_empty()
    }

    /// Apply this update to an in-memory copy of the user.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(password) = &self.password {
            user.password = password.clone();
        }
        if let Some(clientes) = &self.clientes {
            user.clientes = clientes.clone();
        }
    }
}

/// User as returned by the API. The password is never echoed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub clientes: Vec<Client>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            clientes: user.clientes,
        }
    }
}

/// Response to a successful create; the only place the token is returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUserResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub bearer_token: String,
}

impl From<User> for CreatedUserResponse {
    fn from(user: User) -> Self {
        let bearer_token = user.bearer_token.clone();
        Self {
            user: user.into(),
            bearer_token,
        }
    }
}
