// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod log_query;

pub use log_query::{filter_log_entries, LogWindow};
