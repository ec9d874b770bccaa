// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! Handlers and extractors return [`AppError`]; [`IntoResponse`] is the
//! only place error bodies are built.

use crate::db::StoreError;
use crate::validation::ValidationFailure;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationFailure),

    #[error("Username already taken: {0}")]
    DuplicateKey(String),

    #[error("Unknown userId: {0}")]
    UnknownUser(String),

    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        source: StoreError,
    },

    /// A failure that only carries a status and message, such as an
    /// extractor rejection.
    #[error("Request rejected ({status:?}): {message:?}")]
    Rejected {
        status: Option<StatusCode>,
        message: Option<String>,
    },

    #[error("Route not found")]
    RouteNotFound,
}

impl AppError {
    /// Wrap a storage failure with the operation that hit it.
    ///
    /// Duplicate usernames keep their own variant.
    pub fn storage(context: &'static str, source: StoreError) -> Self {
        match source {
            StoreError::DuplicateKey(username) => AppError::DuplicateKey(username),
            source => AppError::Storage { context, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateKey(_) | AppError::UnknownUser(_) => StatusCode::FORBIDDEN,
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Rejected { status, .. } => {
                status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Body for unmatched routes
#[derive(Serialize)]
struct NotFoundResponse {
    status: u16,
    message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error = match self {
            AppError::Validation(failure) => failure.first_message().to_string(),
            AppError::DuplicateKey(username) => {
                tracing::warn!(username = %username, "Duplicate username");
                "username already taken".to_string()
            }
            AppError::UnknownUser(user_id) => {
                tracing::warn!(user_id = %user_id, "Unknown userId");
                "unknown userId".to_string()
            }
            AppError::Storage { context, source } => {
                tracing::error!(error = %source, context, "Storage error");
                context.to_string()
            }
            AppError::Rejected { message, .. } => {
                message.unwrap_or_else(|| "Internal Server Error".to_string())
            }
            AppError::RouteNotFound => {
                let body = NotFoundResponse {
                    status: status.as_u16(),
                    message: "not found",
                };
                return (status, Json(body)).into_response();
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
