// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user mutation locks.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes read-modify-write cycles on a single user document.
///
/// Shared by the user and client services so a user rewrite cannot
/// interleave with a client list write-back. Email addresses get their own
/// keys so the uniqueness check and the write that claims an address happen
/// as one step. Callers holding both take the user lock first.
#[derive(Clone, Default)]
pub struct UserLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `user_id`.
    pub async fn lock(&self, user_id: &str) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the map shard is not held across the await.
        let lock = self
            .locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Wait for exclusive right to claim `email`.
    pub async fn lock_email(&self, email: &str) -> OwnedMutexGuard<()> {
        self.lock(&format!("email:{email}")).await
    }

    /// Drop the lock entry for a user that no longer exists.
    pub fn forget(&self, user_id: &str) {
        self.locks.remove(user_id);
    }
}
