// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise Tracker API Server
//!
//! Registers users and records exercises against them, with a per-user
//! exercise log that can be filtered by date and capped in length.

use anyhow::Context;
use exercise_tracker::{
    config::{Config, StoreUrl},
    db::{FirestoreDb, MemoryDb, Store},
    routes::create_router,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(port = config.port, "Starting Exercise Tracker API");

    match config.store_url.clone() {
        StoreUrl::Firestore { project_id } => {
            let db = FirestoreDb::new(&project_id)
                .await
                .context("Failed to connect to Firestore")?;
            serve(config, db).await
        }
        StoreUrl::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            serve(config, MemoryDb::new()).await
        }
    }
}

async fn serve<S>(config: Config, db: S) -> anyhow::Result<()>
where
    S: Store + Sync + 'static,
{
    let addr = format!("0.0.0.0:{}", config.port);
    let state = Arc::new(AppState { config, db });
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive("exercise_tracker=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();

    Ok(())
}
