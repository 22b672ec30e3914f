// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile + exercise counter + log reference list)
//! - Exercise logs (flat immutable records)
//!
//! Cross-document consistency (log creation plus the user's count/log
//! update) goes through Firestore transactions, so concurrent submissions
//! for the same user cannot lose increments and no orphan logs are left
//! behind on a failed user update.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{ExerciseLog, User, UsernameIndex};
use futures_util::{stream, StreamExt, TryStreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing
        // a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Clone the client with the transaction id attached.
    ///
    /// Only reads issued with the transaction id join the transaction's
    /// read set; reads through the plain client would leave the commit
    /// free to overwrite concurrent updates.
    fn tx_client(
        client: &firestore::FirestoreDb,
        transaction: &firestore::FirestoreTransaction<'_>,
    ) -> firestore::FirestoreDb {
        client.clone_with_consistency_selector(
            firestore::FirestoreConsistencySelector::Transaction(
                transaction.transaction_id().clone(),
            ),
        )
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Create a new user, enforcing username uniqueness.
    ///
    /// The user document and a `usernames/{username}` index document are
    /// written in one transaction, and the index read carries the
    /// transaction id so it is part of the commit's read set: of two
    /// concurrent creations of the same username, at most one commit can
    /// succeed.
    pub async fn create_user(&self, username: &str) -> Result<User, AppError> {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // Read the index document with the transaction id attached so the
        // commit aborts if a concurrent creation claims the same username.
        let existing: Option<UsernameIndex> = Self::tx_client(client, &transaction)
            .fluent()
            .select()
            .by_id_in(collections::USERNAMES)
            .obj()
            .one(username)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if let Some(taken) = existing {
            let _ = transaction.rollback().await;
            tracing::debug!(username, user_id = %taken.user_id, "Username already taken");
            return Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                username
            )));
        }

        let user = User::new(username);
        let index = UsernameIndex {
            username: user.username.clone(),
            user_id: user.id.clone(),
        };

        client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(&user)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add user to transaction: {}", e)))?;

        client
            .fluent()
            .update()
            .in_col(collections::USERNAMES)
            .document_id(&index.username)
            .object(&index)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add username index to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(user_id = %user.id, username, "User created");

        Ok(user)
    }

    /// Get a user by document ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List every user.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Exercise Log Operations ─────────────────────────────────

    /// Get one exercise log by document ID.
    pub async fn get_exercise_log(&self, log_id: &str) -> Result<Option<ExerciseLog>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::EXERCISE_LOGS)
            .obj()
            .one(log_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Resolve a user's log reference list to full exercise records.
    ///
    /// Fetches are issued with bounded concurrency but results keep the
    /// reference-list order (association order). References to missing
    /// documents are dropped with a warning.
    pub async fn resolve_logs(&self, log_ids: &[String]) -> Result<Vec<ExerciseLog>, AppError> {
        let client = self.get_client()?;

        let resolved: Vec<Option<ExerciseLog>> = stream::iter(log_ids.to_vec())
            .map(|log_id| async move {
                let log: Option<ExerciseLog> = client
                    .fluent()
                    .select()
                    .by_id_in(collections::EXERCISE_LOGS)
                    .obj()
                    .one(&log_id)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;

                if log.is_none() {
                    tracing::warn!(log_id = %log_id, "Dangling exercise log reference");
                }

                Ok::<_, AppError>(log)
            })
            // `buffered` (not `buffer_unordered`) preserves association order
            .buffered(MAX_CONCURRENT_DB_OPS)
            .try_collect()
            .await?;

        Ok(resolved.into_iter().flatten().collect())
    }

    // ─── Atomic Exercise Association ─────────────────────────────

    /// Atomically persist an exercise log and link it to a user.
    ///
    /// One transaction writes the log document and the user document with
    /// `count` incremented and the log id appended, so `count == log.len()`
    /// holds even under concurrent submissions for the same user: the user
    /// read carries the transaction id, so transactions on the same user
    /// serialize at the store and a conflicting commit aborts instead of
    /// overwriting. A failed commit leaves no orphan log behind.
    ///
    /// Returns the updated user. Fails with `NotFound` before any write if
    /// the user does not exist.
    pub async fn add_exercise_atomic(
        &self,
        user_id: &str,
        log: &ExerciseLog,
    ) -> Result<User, AppError> {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // Read the user with the transaction id attached: only reads that
        // carry the transaction id are in the commit's read set, so a
        // concurrent update to this user aborts the commit instead of
        // being overwritten.
        let user: Option<User> = Self::tx_client(client, &transaction)
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to read user in transaction: {}", e)))?;

        let Some(mut user) = user else {
            let _ = transaction.rollback().await;
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        };

        user.count += 1;
        user.log.push(log.id.clone());

        client
            .fluent()
            .update()
            .in_col(collections::EXERCISE_LOGS)
            .document_id(&log.id)
            .object(log)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add exercise log to transaction: {}", e))
            })?;

        client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(&user)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add user to transaction: {}", e)))?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(
            user_id = %user.id,
            log_id = %log.id,
            count = user.count,
            "Exercise logged"
        );

        Ok(user)
    }
}
