// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Exercise model for storage and API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stored exercise record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Generated identifier (also used as document ID)
    pub id: String,
    /// Owning user ID. Not enforced by the store.
    pub user_id: String,
    pub description: String,
    /// Duration in minutes
    pub duration: i64,
    /// Calendar date, persisted as `YYYY-MM-DD` so string order is date order
    pub date: NaiveDate,
}

/// Validated input for a new exercise, before an ID is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExercise {
    pub user_id: String,
    pub description: String,
    pub duration: i64,
    pub date: NaiveDate,
}

impl NewExercise {
    /// Attach a generated ID.
    pub fn into_exercise(self, id: String) -> Exercise {
        Exercise {
            id,
            user_id: self.user_id,
            description: self.description,
            duration: self.duration,
            date: self.date,
        }
    }
}
