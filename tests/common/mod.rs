// SPDX-License-Identifier: MIT

use lingua_track::config::Config;
use lingua_track::db::FirestoreDb;
use lingua_track::middleware::auth::create_access_token;
use lingua_track::routes::create_router;
use lingua_track::services::{DefinitionOracle, InteractionTracker, ProgressService, WordCatalog};
use lingua_track::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Build an interaction tracker over the given database.
#[allow(dead_code)]
pub fn test_tracker(db: FirestoreDb) -> InteractionTracker {
    let pair_locks = Arc::new(dashmap::DashMap::new());
    InteractionTracker::new(db, pair_locks, false)
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_app_with_db(test_db_offline())
}

/// Create a test app over the given database (offline mock or emulator).
/// The oracle is wired to the unreachable test endpoint.
#[allow(dead_code)]
pub fn create_app_with_db(db: FirestoreDb) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let tracker = test_tracker(db.clone());
    let oracle = DefinitionOracle::new(&config);
    let catalog = WordCatalog::new(db.clone(), oracle, tracker.clone());
    let progress = ProgressService::new(db.clone());

    let state = Arc::new(AppState {
        config,
        db,
        tracker,
        catalog,
        progress,
    });

    (create_router(state.clone()), state)
}

/// Create a signed access token for a test user.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    create_access_token(user_id, signing_key).expect("Failed to create test token")
}
