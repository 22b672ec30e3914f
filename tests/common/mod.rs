// SPDX-License-Identifier: MIT

use exercise_tracker::config::Config;
use exercise_tracker::db::FirestoreDb;
use exercise_tracker::routes::create_router;
use exercise_tracker::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with an offline mock database.
#[allow(dead_code)]
pub fn create_test_app() -> axum::Router {
    let config = Config::default();
    let db = test_db_offline();

    let state = Arc::new(AppState { config, db });
    create_router(state)
}

/// Create a test app backed by the Firestore emulator.
#[allow(dead_code)]
pub async fn create_emulator_app() -> axum::Router {
    let config = Config::default();
    let db = test_db().await;

    let state = Arc::new(AppState { config, db });
    create_router(state)
}

/// Generate a unique username for test isolation.
#[allow(dead_code)]
pub fn unique_username(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}
