//! Exercise log model for storage and API.

use crate::dates::display_date;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One immutable exercise event.
///
/// `date` is the fixed human-readable rendering of `date_obj`, derived once
/// at creation. The two never diverge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseLog {
    /// Generated document ID
    pub id: String,
    /// What was done
    pub description: String,
    /// Duration in minutes; stored as given, no range validation
    pub duration: i64,
    /// True date value used for range filtering
    pub date_obj: DateTime<Utc>,
    /// Display rendering of `date_obj`, e.g. "Mon Jan 01 2020"
    pub date: String,
}

impl ExerciseLog {
    pub fn new(description: &str, duration: i64, date_obj: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            description: description.to_string(),
            duration,
            date_obj,
            date: display_date(date_obj),
        }
    }
}
