// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage plus username reservations)
//! - Exercises (per-user log entries)

use crate::db::{collections, is_generated_id, new_id, ExerciseQuery, Store, StoreError};
use crate::models::user::UsernameClaim;
use crate::models::{Exercise, NewExercise, User};
use crate::time_utils::format_iso_date;
use firestore::errors::FirestoreError;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, StoreError> {
        // The emulator does not check credentials; skip the local credential lookup.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, StoreError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

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
            StoreError::Backend(format!("Failed to connect to Firestore Emulator: {}", e))
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
    fn get_client(&self) -> Result<&firestore::FirestoreDb, StoreError> {
        self.client
            .as_ref()
            .ok_or_else(|| StoreError::Backend("Database not connected (offline mode)".to_string()))
    }
}

/// Document ID of a username reservation.
fn username_doc_id(username: &str) -> String {
    hex::encode(username.as_bytes())
}

fn backend(e: FirestoreError) -> StoreError {
    StoreError::Backend(e.to_string())
}

impl Store for FirestoreDb {
    // ─── User Operations ─────────────────────────────────────────

    /// Reserve the username first; an existing reservation means the
    /// name is taken. There is no transaction, so a failed user write
    /// leaves an orphaned reservation behind.
    ///
    /// The reservation ID is the hex-encoded username, since usernames
    /// may contain `/` or be `.`, `..` or `__x__`, none of which are
    /// valid document IDs.
    async fn create_user(&self, username: &str) -> Result<User, StoreError> {
        let client = self.get_client()?;
        let user = User {
            id: new_id(),
            username: username.to_string(),
        };

        let claim = UsernameClaim {
            user_id: user.id.clone(),
        };
        let reserved: Result<UsernameClaim, FirestoreError> = client
            .fluent()
            .insert()
            .into(collections::USERNAMES)
            .document_id(username_doc_id(username))
            .object(&claim)
            .execute()
            .await;

        match reserved {
            Ok(_) => {}
            Err(FirestoreError::DataConflictError(_)) => {
                return Err(StoreError::DuplicateKey(username.to_string()));
            }
            Err(e) => return Err(backend(e)),
        }

        let _: User = client
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.id)
            .object(&user)
            .execute()
            .await
            .map_err(backend)?;

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(backend)
    }

    /// IDs this store could not have generated are unknown, not errors;
    /// they may not even form a valid document path.
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let client = self.get_client()?;
        if !is_generated_id(id) {
            return Ok(None);
        }

        client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(id)
            .await
            .map_err(backend)
    }

    // ─── Exercise Operations ─────────────────────────────────────

    async fn create_exercise(&self, exercise: NewExercise) -> Result<Exercise, StoreError> {
        let exercise = exercise.into_exercise(new_id());

        let _: Exercise = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::EXERCISES)
            .document_id(&exercise.id)
            .object(&exercise)
            .execute()
            .await
            .map_err(backend)?;

        Ok(exercise)
    }

    /// Dates are stored as `YYYY-MM-DD` strings, so string comparison
    /// gives the exclusive date bounds.
    async fn query_exercises(&self, query: &ExerciseQuery) -> Result<Vec<Exercise>, StoreError> {
        let user_id = query.user_id.clone();
        let from = query.from.map(format_iso_date);
        let to = query.to.map(format_iso_date);

        let select = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::EXERCISES)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    from.clone().and_then(|d| q.field("date").greater_than(d)),
                    to.clone().and_then(|d| q.field("date").less_than(d)),
                ])
            });

        let select = match query.limit {
            Some(limit) => select.limit(limit),
            None => select,
        };

        select.obj().query().await.map_err(backend)
    }
}
