// SPDX-License-Identifier: MIT

//! Lingua-Track API Server
//!
//! Backend for a language-learning app: per-user word interaction
//! counters over Firestore, a word catalog enriched by a definition
//! oracle, articles, feedback and progress summaries.

use lingua_track::{
    config::Config,
    db::FirestoreDb,
    services::{DefinitionOracle, InteractionTracker, ProgressService, WordCatalog},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Lingua-Track API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Per-pair interaction locks, shared across all tracker clones
    // within this instance
    let pair_locks = Arc::new(dashmap::DashMap::new());

    let tracker = InteractionTracker::new(db.clone(), pair_locks, config.strict_references);
    tracing::info!(
        strict_references = config.strict_references,
        "Interaction tracker initialized"
    );

    let oracle = DefinitionOracle::new(&config);
    tracing::info!(model = %config.oracle_model, "Definition oracle initialized");

    let catalog = WordCatalog::new(db.clone(), oracle, tracker.clone());
    let progress = ProgressService::new(db.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        tracker,
        catalog,
        progress,
    });

    // Build router
    let app = lingua_track::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lingua_track=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
