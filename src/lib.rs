// SPDX-License-Identifier: MIT

//! Exercise Tracker: a small REST API for logging exercises against users.
//!
//! Users are created by username, exercises are logged against a user, and
//! a user's exercise log can be queried with date-range and count filters.

pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
}
