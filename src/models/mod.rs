// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod client;
pub mod user;
pub mod validation;

pub use client::{Address, Client};
pub use user::{User, UserResponse};
