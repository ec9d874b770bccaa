// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request validation and normalization.
//!
//! Raw request input is turned into immutable parsed values by a fixed
//! sequence of named steps. Each step either returns its normalized
//! output or a [`ValidationFailure`]; handlers only ever see the parsed
//! values.

use crate::db::ExerciseQuery;
use crate::models::NewExercise;
use crate::time_utils::parse_calendar_date;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use validator::{Validate, ValidationErrors};

pub const MISSING_USER_ID: &str = "missing userId";
pub const DURATION_NOT_NUMERIC: &str = "duration must be numeric";
pub const INVALID_DATE: &str = "invalid date";

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Validation failure carrying one or more field errors.
///
/// Only the first error is reported to clients. Errors are kept in the
/// order the fields are checked; errors converted from `validator` are
/// ordered by field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    errors: Vec<FieldError>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.first_message())
    }
}

impl std::error::Error for ValidationFailure {}

impl ValidationFailure {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field: field.to_string(),
                message: message.into(),
            }],
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn first_message(&self) -> &str {
        self.errors
            .first()
            .map_or("invalid request", |e| e.message.as_str())
    }
}

impl From<ValidationErrors> for ValidationFailure {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<(String, Vec<validator::ValidationError>)> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| (field.to_string(), errs.clone()))
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let errors = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.into_iter().map(move |e| FieldError {
                    field: field.clone(),
                    message: e
                        .message
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();

        Self { errors }
    }
}

// ─── New User ────────────────────────────────────────────────

pub const USERNAME_RULE: &str = "username must be between 1 and 64 characters";

/// Body of a new-user request.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct NewUserForm {
    #[validate(
        required(message = "username must be between 1 and 64 characters"),
        length(
            min = 1,
            max = 64,
            message = "username must be between 1 and 64 characters"
        )
    )]
    pub username: Option<String>,
}

/// Validate a new-user request, returning the username.
///
/// Missing, null and blank usernames are all rejected the same way.
pub fn parse_new_user(form: NewUserForm) -> Result<String, ValidationFailure> {
    let form = NewUserForm {
        username: non_blank(form.username),
    };
    form.validate()?;
    form.username
        .ok_or_else(|| ValidationFailure::new("username", USERNAME_RULE))
}

// ─── New Exercise ────────────────────────────────────────────

/// Body of a new-exercise request, as submitted.
#[derive(Debug, Default, Deserialize)]
pub struct NewExerciseForm {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub description: Option<String>,
    /// Number or numeric string
    pub duration: Option<Value>,
    /// Blank means "today"
    pub date: Option<String>,
}

/// Run the new-exercise pipeline: required fields, duration, date.
pub fn parse_new_exercise(
    form: NewExerciseForm,
    today: NaiveDate,
) -> Result<NewExercise, ValidationFailure> {
    let (user_id, description, duration) =
        require_fields(form.user_id, form.description, form.duration)?;
    let duration = coerce_duration(&duration)?;
    let date = normalize_date(form.date.as_deref(), today)?;

    Ok(NewExercise {
        user_id,
        description,
        duration,
        date,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn missing(field: &str) -> FieldError {
    FieldError {
        field: field.to_string(),
        message: format!("missing required field: {field}"),
    }
}

/// Every absent or blank field is recorded, in declaration order.
fn require_fields(
    user_id: Option<String>,
    description: Option<String>,
    duration: Option<Value>,
) -> Result<(String, String, Value), ValidationFailure> {
    let user_id = non_blank(user_id).map(|id| id.trim().to_string());
    let description = non_blank(description);
    let duration = duration.filter(|d| !matches!(d, Value::String(s) if s.trim().is_empty()));

    match (user_id, description, duration) {
        (Some(user_id), Some(description), Some(duration)) => {
            Ok((user_id, description, duration))
        }
        (user_id, description, duration) => {
            let mut errors = Vec::new();
            if user_id.is_none() {
                errors.push(missing("userId"));
            }
            if description.is_none() {
                errors.push(missing("description"));
            }
            if duration.is_none() {
                errors.push(missing("duration"));
            }
            Err(ValidationFailure { errors })
        }
    }
}

/// Accepts integers, whole-valued floats, and strings holding either.
fn coerce_duration(value: &Value) -> Result<i64, ValidationFailure> {
    let minutes = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole_number)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_number))
        }
        _ => None,
    };

    minutes.ok_or_else(|| ValidationFailure::new("duration", DURATION_NOT_NUMERIC))
}

fn whole_number(value: f64) -> Option<i64> {
    let in_range = (i64::MIN as f64..=i64::MAX as f64).contains(&value);
    (value.is_finite() && value.fract() == 0.0 && in_range).then_some(value as i64)
}

/// Absent or blank defaults to `today`.
fn normalize_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, ValidationFailure> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(today),
        Some(s) => {
            parse_calendar_date(s).ok_or_else(|| ValidationFailure::new("date", INVALID_DATE))
        }
    }
}

// ─── Log Query ───────────────────────────────────────────────

/// Query string of a log request, as submitted.
#[derive(Debug, Default, Deserialize)]
pub struct LogQueryParams {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

/// Run the log pre-check: userId, limit, then the date bounds.
pub fn parse_log_query(params: LogQueryParams) -> Result<ExerciseQuery, ValidationFailure> {
    let user_id = require_user_id(params.user_id)?;
    let limit = parse_limit(params.limit.as_deref());
    let from = parse_bound("from", params.from.as_deref())?;
    let to = parse_bound("to", params.to.as_deref())?;

    Ok(ExerciseQuery {
        user_id,
        from,
        to,
        limit,
    })
}

fn require_user_id(user_id: Option<String>) -> Result<String, ValidationFailure> {
    non_blank(user_id)
        .map(|id| id.trim().to_string())
        .ok_or_else(|| ValidationFailure::new("userId", MISSING_USER_ID))
}

/// The leading integer caps the log, so `2.5` and `2abc` both mean 2.
/// No leading digits, zero or a negative value means no cap. Values
/// too large for `u32` saturate.
fn parse_limit(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim_start();
    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if negative || digits.is_empty() {
        return None;
    }

    let limit = digits
        .parse::<u64>()
        .map_or(u32::MAX, |n| u32::try_from(n).unwrap_or(u32::MAX));
    (limit > 0).then_some(limit)
}

fn parse_bound(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, ValidationFailure> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse_calendar_date(s)
            .map(Some)
            .ok_or_else(|| ValidationFailure::new(field, INVALID_DATE)),
    }
}
