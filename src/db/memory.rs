// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store for local development and tests.
//!
//! Records are kept in insertion order. Username uniqueness is checked
//! through the `DashMap` entry API, so two concurrent registrations of
//! the same name cannot both succeed.

use crate::db::{new_id, ExerciseQuery, Store, StoreError};
use crate::models::{Exercise, NewExercise, User};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Inner {
    users: RwLock<Vec<User>>,
    /// username -> user ID
    usernames: DashMap<String, String>,
    exercises: RwLock<Vec<Exercise>>,
}

/// Memory-backed store. Cloning shares the underlying data.
#[derive(Clone, Default)]
pub struct MemoryDb {
    inner: Arc<Inner>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, StoreError> {
    lock.read()
        .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, StoreError> {
    lock.write()
        .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
}

impl Store for MemoryDb {
    async fn create_user(&self, username: &str) -> Result<User, StoreError> {
        let user = User {
            id: new_id(),
            username: username.to_string(),
        };

        match self.inner.usernames.entry(username.to_string()) {
            Entry::Occupied(_) => return Err(StoreError::DuplicateKey(username.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(user.id.clone());
            }
        }

        write(&self.inner.users)?.push(user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(read(&self.inner.users)?.clone())
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(read(&self.inner.users)?
            .iter()
            .find(|user| user.id == id)
            .cloned())
    }

    async fn create_exercise(&self, exercise: NewExercise) -> Result<Exercise, StoreError> {
        let exercise = exercise.into_exercise(new_id());
        write(&self.inner.exercises)?.push(exercise.clone());
        Ok(exercise)
    }

    async fn query_exercises(&self, query: &ExerciseQuery) -> Result<Vec<Exercise>, StoreError> {
        let limit = query.limit.map_or(usize::MAX, |n| n as usize);

        Ok(read(&self.inner.exercises)?
            .iter()
            .filter(|exercise| query.matches(exercise))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn new_exercise(user_id: &str, d: u32) -> NewExercise {
        NewExercise {
            user_id: user_id.to_string(),
            description: format!("run {d}"),
            duration: 30,
            date: day(d),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = MemoryDb::new();
        db.create_user("alice").await.unwrap();

        let err = db.create_user("alice").await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(name) if name == "alice"));
        assert_eq!(db.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_user_by_id() {
        let db = MemoryDb::new();
        let user = db.create_user("bob").await.unwrap();

        assert_eq!(db.find_user_by_id(&user.id).await.unwrap(), Some(user));
        assert_eq!(db.find_user_by_id("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_query_uses_exclusive_bounds_and_limit() {
        let db = MemoryDb::new();
        for d in 1..=5 {
            db.create_exercise(new_exercise("u1", d)).await.unwrap();
        }
        db.create_exercise(new_exercise("u2", 3)).await.unwrap();

        let bounded = db
            .query_exercises(&ExerciseQuery {
                user_id: "u1".to_string(),
                from: Some(day(1)),
                to: Some(day(5)),
                limit: None,
            })
            .await
            .unwrap();
        let dates: Vec<_> = bounded.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(2), day(3), day(4)]);

        let limited = db
            .query_exercises(&ExerciseQuery {
                user_id: "u1".to_string(),
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].date, day(1));
    }
}
