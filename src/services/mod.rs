// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod clients;
pub mod locks;
pub mod token;
pub mod users;

pub use clients::ClientService;
pub use locks::UserLocks;
pub use users::UserService;
