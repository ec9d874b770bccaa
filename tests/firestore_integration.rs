// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running and
//! FIRESTORE_EMULATOR_HOST to point at it. They skip otherwise.

use chrono::NaiveDate;
use exercise_tracker::db::{ExerciseQuery, Store, StoreError};
use exercise_tracker::models::NewExercise;

mod common;
use common::test_db;

/// Generate a unique username for test isolation.
fn unique_username(prefix: &str) -> String {
    format!("{prefix}-{}", nanos_suffix())
}

fn nanos_suffix() -> u128 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

#[tokio::test]
async fn test_create_and_find_user() {
    require_emulator!();

    let db = test_db().await;
    let username = unique_username("find");

    let user = db.create_user(&username).await.unwrap();
    assert_eq!(user.username, username);

    let fetched = db.find_user_by_id(&user.id).await.unwrap();
    assert_eq!(fetched, Some(user.clone()));

    let users = db.list_users().await.unwrap();
    assert!(users.contains(&user));

    assert_eq!(db.find_user_by_id("does-not-exist").await.unwrap(), None);
}

#[tokio::test]
async fn test_duplicate_username_is_conflict() {
    require_emulator!();

    let db = test_db().await;
    let username = unique_username("dup");

    db.create_user(&username).await.unwrap();
    let err = db.create_user(&username).await.unwrap_err();

    assert!(matches!(err, StoreError::DuplicateKey(name) if name == username));
}

#[tokio::test]
async fn test_usernames_that_are_not_valid_document_ids() {
    require_emulator!();

    let db = test_db().await;
    let suffix = nanos_suffix();

    for name in ["a/b", ".", "..", "__x__"] {
        // Tests share one emulator, so make each name unique per run.
        let username = format!("{name}{suffix}");
        for bare in [name.to_string(), username.clone()] {
            match db.create_user(&bare).await {
                Ok(user) => assert_eq!(user.username, bare),
                // Exact names like "." may already exist from an earlier run.
                Err(StoreError::DuplicateKey(dup)) => assert_eq!(dup, bare),
                Err(e) => panic!("creating {bare:?} failed: {e}"),
            }
        }

        let err = db.create_user(&username).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(dup) if dup == username));
    }
}

#[tokio::test]
async fn test_find_user_by_malformed_id_is_none() {
    require_emulator!();

    let db = test_db().await;

    for id in ["a/b", "..", "__x__", "users/abc"] {
        assert_eq!(db.find_user_by_id(id).await.unwrap(), None, "{id}");
    }
}

#[tokio::test]
async fn test_query_exercises_exclusive_bounds() {
    require_emulator!();

    let db = test_db().await;
    let user = db.create_user(&unique_username("log")).await.unwrap();

    for d in 1..=5 {
        db.create_exercise(NewExercise {
            user_id: user.id.clone(),
            description: format!("day {d}"),
            duration: 20,
            date: day(d),
        })
        .await
        .unwrap();
    }

    let mut dates: Vec<NaiveDate> = db
        .query_exercises(&ExerciseQuery {
            user_id: user.id.clone(),
            from: Some(day(1)),
            to: Some(day(5)),
            limit: None,
        })
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.date)
        .collect();
    dates.sort();
    assert_eq!(dates, vec![day(2), day(3), day(4)]);

    let limited = db
        .query_exercises(&ExerciseQuery {
            user_id: user.id.clone(),
            limit: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(limited.len(), 2);
}

#[tokio::test]
async fn test_offline_client_fails_every_operation() {
    let db = exercise_tracker::db::FirestoreDb::new_mock();

    assert!(matches!(
        db.create_user("alice").await,
        Err(StoreError::Backend(_))
    ));
    assert!(matches!(db.list_users().await, Err(StoreError::Backend(_))));
    assert!(matches!(
        db.find_user_by_id("x").await,
        Err(StoreError::Backend(_))
    ));
}
