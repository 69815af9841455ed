// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Random credential and identifier generation.

use crate::error::AppError;
use ring::rand::{SecureRandom, SystemRandom};

/// Bytes of entropy in a bearer token.
pub const TOKEN_BYTES: usize = 32;

/// Generate a fresh bearer token: 32 random bytes, hex encoded.
pub fn generate_bearer_token(rng: &SystemRandom) -> Result<String, AppError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    rng.fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;
    Ok(hex::encode(bytes))
}

/// Generate an id for a new client record.
pub fn generate_client_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Extract the credential from an `Authorization` header value.
///
/// The token is the second whitespace-separated part (`Bearer <token>`).
pub fn bearer_from_header(value: &str) -> Option<&str> {
    value.split_whitespace().nth(1)
}
