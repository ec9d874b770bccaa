// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage access layer.
//!
//! [`Store`] is the seam between the HTTP layer and persistence. Two
//! backends implement it: [`FirestoreDb`] for deployments and
//! [`MemoryDb`] for local development and tests.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::models::{Exercise, NewExercise, User};
use chrono::NaiveDate;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Username reservations (document ID = username)
    pub const USERNAMES: &str = "usernames";
    pub const EXERCISES: &str = "exercises";
}

/// Storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Duplicate key: username '{0}' already exists")]
    DuplicateKey(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Filter for an exercise log query.
///
/// Date bounds are exclusive: a record dated exactly `from` or `to` is
/// not returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseQuery {
    pub user_id: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<u32>,
}

impl ExerciseQuery {
    /// Whether an exercise passes the user and date filters (limit aside).
    pub fn matches(&self, exercise: &Exercise) -> bool {
        exercise.user_id == self.user_id
            && self.from.is_none_or(|from| exercise.date > from)
            && self.to.is_none_or(|to| exercise.date < to)
    }
}

const ID_LEN: usize = 32;

/// Generate a new document identifier (32 lowercase hex digits).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Whether `id` has the shape of a [`new_id`] identifier.
pub fn is_generated_id(id: &str) -> bool {
    id.len() == ID_LEN && id.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Persistence operations used by the request handlers.
#[trait_variant::make(Store: Send)]
pub trait LocalStore {
    /// Create a user. Fails with [`StoreError::DuplicateKey`] if the
    /// username is taken.
    async fn create_user(&self, username: &str) -> Result<User, StoreError>;

    /// List every user.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// Look up a user. An unknown ID is `Ok(None)`.
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// Store a new exercise.
    async fn create_exercise(&self, exercise: NewExercise) -> Result<Exercise, StoreError>;

    /// Exercises matching `query`, in the backend's natural order.
    async fn query_exercises(&self, query: &ExerciseQuery) -> Result<Vec<Exercise>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_recognized() {
        assert!(is_generated_id(&new_id()));
        assert!(!is_generated_id("a/b"));
        assert!(!is_generated_id(".."));
        assert!(!is_generated_id(""));
        assert!(!is_generated_id(&new_id().to_uppercase()));
        assert!(!is_generated_id(&format!("{}0", new_id())));
    }
}
