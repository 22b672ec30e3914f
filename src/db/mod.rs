//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Username uniqueness index (keyed by username)
    pub const USERNAMES: &str = "usernames";
    pub const EXERCISE_LOGS: &str = "exercise_logs";
}
