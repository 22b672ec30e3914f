// SPDX-License-Identifier: MIT

//! User and exercise log routes.

use crate::dates::{parse_exercise_date, parse_query_date};
use crate::error::{AppError, Result};
use crate::models::{ExerciseLog, User};
use crate::services::{filter_log_entries, LogWindow};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use futures_util::{stream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_CONCURRENT_RESOLVES: usize = 10;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", post(create_user).get(list_users))
        .route("/api/users/{id}/exercises", post(add_exercise))
        .route("/api/users/{id}/logs", get(get_logs))
}

// ─── Create User ─────────────────────────────────────────────

#[derive(Deserialize)]
struct CreateUserRequest {
    username: String,
}

/// Response for user creation.
#[derive(Serialize)]
pub struct CreateUserResponse {
    pub username: String,
    pub id: String,
}

/// Create a new user from a username.
async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>> {
    let username = body.username.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("username is required".to_string()));
    }

    let user = state.db.create_user(username).await?;

    Ok(Json(CreateUserResponse {
        username: user.username,
        id: user.id,
    }))
}

// ─── Log Exercise ────────────────────────────────────────────

#[derive(Deserialize)]
struct AddExerciseRequest {
    description: String,
    duration: i64,
    /// Strict YYYY-MM-DD; defaults to today when absent or empty
    date: Option<String>,
}

/// Response for a newly logged exercise: the affected user's id/username
/// plus the new log's fields.
#[derive(Serialize)]
pub struct AddExerciseResponse {
    pub id: String,
    pub username: String,
    pub date: String,
    pub duration: i64,
    pub description: String,
}

/// Log an exercise against a user.
///
/// Date validation happens before anything is persisted; the log document
/// and the user's count/log update then commit in one transaction.
async fn add_exercise(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(body): Json<AddExerciseRequest>,
) -> Result<Json<AddExerciseResponse>> {
    if body.description.is_empty() {
        return Err(AppError::BadRequest("description is required".to_string()));
    }

    let date_obj = parse_exercise_date(body.date.as_deref())?;
    let log = ExerciseLog::new(&body.description, body.duration, date_obj);

    let user = state.db.add_exercise_atomic(&user_id, &log).await?;

    Ok(Json(AddExerciseResponse {
        id: user.id,
        username: user.username,
        date: log.date,
        duration: log.duration,
        description: log.description,
    }))
}

// ─── Query Logs ──────────────────────────────────────────────

#[derive(Deserialize)]
struct LogsQuery {
    /// Inclusive lower date bound (YYYY-MM-DD)
    from: Option<String>,
    /// Inclusive upper date bound (YYYY-MM-DD)
    to: Option<String>,
    /// Maximum entries to return; <= 0 means no truncation. Kept as a
    /// string so `?limit=` (empty) can be treated as absent.
    limit: Option<String>,
}

/// Empty query parameters (`?from=&to=&limit=`) count as absent.
fn non_empty(param: Option<&str>) -> Option<&str> {
    param.filter(|raw| !raw.is_empty())
}

/// One resolved log entry in a user response.
#[derive(Serialize)]
pub struct LogEntryResponse {
    pub id: String,
    pub description: String,
    pub duration: i64,
    pub date: String,
}

/// A user with their resolved (possibly filtered) log.
///
/// `count` is the lifetime total and is not affected by filtering.
#[derive(Serialize)]
pub struct UserLogResponse {
    pub id: String,
    pub username: String,
    pub count: u32,
    pub log: Vec<LogEntryResponse>,
}

impl UserLogResponse {
    fn new(user: User, entries: Vec<ExerciseLog>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            count: user.count,
            log: entries
                .into_iter()
                .map(|entry| LogEntryResponse {
                    id: entry.id,
                    description: entry.description,
                    duration: entry.duration,
                    date: entry.date,
                })
                .collect(),
        }
    }
}

/// Get a user's exercise log, filtered by date range and entry count.
async fn get_logs(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<LogsQuery>,
) -> Result<Json<UserLogResponse>> {
    tracing::debug!(
        user_id = %user_id,
        from = ?params.from,
        to = ?params.to,
        limit = ?params.limit,
        "Fetching exercise log"
    );

    let window = LogWindow {
        from: non_empty(params.from.as_deref())
            .map(|raw| parse_query_date("from", raw))
            .transpose()?,
        to: non_empty(params.to.as_deref())
            .map(|raw| parse_query_date("to", raw))
            .transpose()?,
        limit: non_empty(params.limit.as_deref())
            .map(|raw| {
                raw.parse::<i64>().map_err(|_| {
                    AppError::BadRequest("Invalid 'limit' parameter: expected an integer".to_string())
                })
            })
            .transpose()?,
    };

    let user = state
        .db
        .get_user(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    let entries = state.db.resolve_logs(&user.log).await?;
    let entries = filter_log_entries(entries, &window, chrono::Utc::now());

    Ok(Json(UserLogResponse::new(user, entries)))
}

// ─── List Users ──────────────────────────────────────────────

/// List every user with their log fully resolved.
///
/// Debug/admin enumeration; cost is linear in stored users and logs.
async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserLogResponse>>> {
    let users = state.db.list_users().await?;

    let responses: Vec<UserLogResponse> = stream::iter(users)
        .map(|user| {
            let db = state.db.clone();
            async move {
                let entries = db.resolve_logs(&user.log).await?;
                Ok::<_, AppError>(UserLogResponse::new(user, entries))
            }
        })
        .buffered(MAX_CONCURRENT_RESOLVES)
        .try_collect()
        .await?;

    Ok(Json(responses))
}
