// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod exercise;
pub mod extract;

use crate::db::Store;
use crate::error::AppError;
use crate::AppState;
use axum::http::{header, Method};
use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Fallback for unmatched routes.
async fn not_found() -> AppError {
    AppError::RouteNotFound
}

/// Build the complete router with all routes.
pub fn create_router<S>(state: Arc<AppState<S>>) -> Router
where
    S: Store + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    // Landing page at `/`, everything else in the static dir under `/public`
    let static_dir = &state.config.static_dir;
    let landing_page = ServeFile::new(static_dir.join("index.html"));
    let assets = ServeDir::new(static_dir);

    Router::new()
        .route_service("/", landing_page)
        .nest_service("/public", assets)
        .route("/health", get(health_check))
        .merge(exercise::routes())
        .fallback(not_found)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
