// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise tracker API routes.

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{Exercise, User};
use crate::routes::extract::{JsonOrForm, LogRequest};
use crate::time_utils::{format_display_date, today};
use crate::validation::{parse_new_exercise, parse_new_user, NewExerciseForm, NewUserForm};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Exercise tracker routes.
pub fn routes<S>() -> Router<Arc<AppState<S>>>
where
    S: Store + Sync + 'static,
{
    Router::new()
        .route("/api/exercise/new-user", post(create_user::<S>))
        .route("/api/exercise/users", get(list_users::<S>))
        .route("/api/exercise/add", post(create_exercise::<S>))
        .route("/api/exercise/log", get(fetch_log::<S>))
}

// ─── Users ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Register a new user.
async fn create_user<S>(
    State(state): State<Arc<AppState<S>>>,
    JsonOrForm(form): JsonOrForm<NewUserForm>,
) -> Result<(StatusCode, Json<UserResponse>)>
where
    S: Store + Sync,
{
    let username = parse_new_user(form)?;

    let user = state
        .db
        .create_user(&username)
        .await
        .map_err(|e| AppError::storage("failed to create user", e))?;

    tracing::info!(user_id = %user.id, username = %user.username, "User created");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// List all users.
async fn list_users<S>(State(state): State<Arc<AppState<S>>>) -> Result<Json<Vec<UserResponse>>>
where
    S: Store + Sync,
{
    let users = state
        .db
        .list_users()
        .await
        .map_err(|e| AppError::storage("failed to list users", e))?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ─── Exercises ───────────────────────────────────────────────

/// Created exercise, combined with its owner.
#[derive(Serialize)]
pub struct ExerciseResponse {
    #[serde(rename = "_id")]
    pub user_id: String,
    pub username: String,
    pub date: String,
    pub duration: i64,
    pub description: String,
}

/// Record an exercise for an existing user.
///
/// The user check and the insert are separate operations with no
/// transaction around them.
async fn create_exercise<S>(
    State(state): State<Arc<AppState<S>>>,
    JsonOrForm(form): JsonOrForm<NewExerciseForm>,
) -> Result<(StatusCode, Json<ExerciseResponse>)>
where
    S: Store + Sync,
{
    let new_exercise = parse_new_exercise(form, today())?;

    let user = state
        .db
        .find_user_by_id(&new_exercise.user_id)
        .await
        .map_err(|e| AppError::storage("failed to add new exercise", e))?
        .ok_or_else(|| AppError::UnknownUser(new_exercise.user_id.clone()))?;

    let exercise = state
        .db
        .create_exercise(new_exercise)
        .await
        .map_err(|e| AppError::storage("failed to add new exercise", e))?;

    tracing::info!(
        user_id = %user.id,
        exercise_id = %exercise.id,
        duration = exercise.duration,
        "Exercise added"
    );

    Ok((
        StatusCode::CREATED,
        Json(ExerciseResponse {
            user_id: user.id,
            username: user.username,
            date: format_display_date(exercise.date),
            duration: exercise.duration,
            description: exercise.description,
        }),
    ))
}

// ─── Log ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct LogEntry {
    pub description: String,
    pub duration: i64,
    pub date: String,
}

impl From<Exercise> for LogEntry {
    fn from(exercise: Exercise) -> Self {
        Self {
            description: exercise.description,
            duration: exercise.duration,
            date: format_display_date(exercise.date),
        }
    }
}

#[derive(Serialize)]
pub struct LogResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub count: usize,
    pub log: Vec<LogEntry>,
}

/// Fetch a user's exercise log.
///
/// The user lookup and the exercise query run concurrently; if either
/// fails the whole request fails.
async fn fetch_log<S>(
    State(state): State<Arc<AppState<S>>>,
    LogRequest(query): LogRequest,
) -> Result<Json<LogResponse>>
where
    S: Store + Sync,
{
    tracing::debug!(
        user_id = %query.user_id,
        from = ?query.from,
        to = ?query.to,
        limit = ?query.limit,
        "Fetching exercise log"
    );

    let (user, exercises) = tokio::try_join!(
        state.db.find_user_by_id(&query.user_id),
        state.db.query_exercises(&query),
    )
    .map_err(|e| AppError::storage("failed to retrieve exercise logs", e))?;

    let user = user.ok_or_else(|| AppError::UnknownUser(query.user_id.clone()))?;
    let log: Vec<LogEntry> = exercises.into_iter().map(LogEntry::from).collect();

    Ok(Json(LogResponse {
        id: user.id,
        username: user.username,
        count: log.len(),
        log,
    }))
}
