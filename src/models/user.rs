//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User document stored in Firestore.
///
/// `count` and `log` are always updated together in one document write, so
/// `count == log.len()` holds at all times. `log` preserves the order in
/// which exercises were associated, not the order of their exercise dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Generated document ID
    pub id: String,
    /// Unique username
    pub username: String,
    /// Lifetime number of exercises logged
    pub count: u32,
    /// Exercise log document IDs, in association order
    pub log: Vec<String>,
}

impl User {
    pub fn new(username: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            count: 0,
            log: Vec::new(),
        }
    }
}

/// Username uniqueness index document, keyed by username.
///
/// Written in the same transaction as the user document so the store itself
/// enforces the uniqueness constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernameIndex {
    pub username: String,
    pub user_id: String,
}
