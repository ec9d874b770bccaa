// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Exercise Tracker: register users and keep a per-user exercise log.
//!
//! This crate provides the REST API for creating users, recording
//! exercises against them and querying each user's log.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod time_utils;
pub mod validation;

use config::Config;

/// Shared application state.
pub struct AppState<S> {
    pub config: Config,
    pub db: S,
}
