// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod exercise;
pub mod user;

pub use exercise::ExerciseLog;
pub use user::{User, UsernameIndex};
