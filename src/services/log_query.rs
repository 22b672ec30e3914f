// SPDX-License-Identifier: MIT

//! Exercise log filtering.
//!
//! The filter runs over the resolved log records in association order. A
//! `limit` truncates that order, so with mixed exercise dates the survivors
//! are the first-associated entries, not the earliest-dated ones.

use crate::models::ExerciseLog;
use chrono::{DateTime, Utc};

/// Date-range and count filters for a log query.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWindow {
    /// Inclusive lower bound; unbounded (epoch minimum) when absent
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound; "now" when absent
    pub to: Option<DateTime<Utc>>,
    /// Maximum entries to return; values <= 0 mean no truncation
    pub limit: Option<i64>,
}

/// Apply a [`LogWindow`] to a user's resolved log entries.
///
/// Entries survive iff `from <= date_obj <= to` (inclusive both ends); a
/// positive `limit` then truncates in association order.
pub fn filter_log_entries(
    entries: Vec<ExerciseLog>,
    window: &LogWindow,
    now: DateTime<Utc>,
) -> Vec<ExerciseLog> {
    let from = window.from.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    let to = window.to.unwrap_or(now);

    let mut filtered: Vec<ExerciseLog> = entries
        .into_iter()
        .filter(|entry| entry.date_obj >= from && entry.date_obj <= to)
        .collect();

    if let Some(limit) = window.limit {
        if limit > 0 {
            filtered.truncate(limit as usize);
        }
    }

    filtered
}
