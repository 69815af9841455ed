// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client records nested inside a user document.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::not_blank;

/// A client owned by exactly one user (lives in the user's `clientes` list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Generated at creation, never changes
    pub id: String,
    pub name: String,
    /// Free-form; not format checked (unlike user emails)
    pub email: String,
    pub address: Address,
}

/// Postal address of a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Address {
    #[validate(custom(function = "not_blank"))]
    pub city: String,
    #[validate(custom(function = "not_blank"))]
    pub country: String,
    #[validate(custom(function = "not_blank"))]
    pub municipality: String,
    #[validate(custom(function = "not_blank"))]
    pub state: String,
}

/// Body of a client create or full replace.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClientPayload {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub email: String,
    #[validate(nested)]
    pub address: Address,
}

impl ClientPayload {
    /// Build the stored record under the given id.
    pub fn into_client(self, id: String) -> Client {
        Client {
            id,
            name: self.name,
            email: self.email,
            address: self.address,
        }
    }
}

/// Body of a client partial update. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<AddressPatch>,
}

/// Address keys to merge into an existing address.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressPatch {
    pub city: Option<String>,
    pub country: Option<String>,
    pub municipality: Option<String>,
    pub state: Option<String>,
}

impl Address {
    /// Shallow merge: supplied keys overwrite, the rest are kept.
    pub fn merge(&mut self, patch: AddressPatch) {
        if let Some(city) = patch.city {
            self.city = city;
        }
        if let Some(country) = patch.country {
            self.country = country;
        }
        if let Some(municipality) = patch.municipality {
            self.municipality = municipality;
        }
        if let Some(state) = patch.state {
            self.state = state;
        }
    }
}

impl Client {
    /// Apply a partial update in place. The id is never touched.
    pub fn apply_patch(&mut self, patch: ClientPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(address) = patch.address {
            self.address.merge(address);
        }
    }
}
