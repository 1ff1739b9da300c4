// SPDX-License-Identifier: MIT

//! Interaction record routes over the tracker.

use crate::error::Result;
use crate::models::Word;
use crate::services::{InteractionPatch, TrackedWord};
use crate::validation::{parse_id, validate_payload, validate_uuid};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/userwords", post(upsert_interaction))
        .route("/userwords/encounter", post(record_encounter))
        .route("/userwords/check", post(record_check))
        .route("/userwords/review", patch(toggle_review))
        // GET takes a user ID; PATCH/DELETE take a composite record ID.
        .route(
            "/userwords/{id}",
            get(list_for_user)
                .patch(update_interaction)
                .delete(delete_interaction),
        )
}

#[derive(Debug, Deserialize, Validate)]
pub struct InteractionRequest {
    #[validate(custom(function = validate_uuid))]
    pub user_id: String,
    #[validate(length(min = 1, message = "word_id is required"))]
    pub word_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertRequest {
    #[validate(custom(function = validate_uuid))]
    pub user_id: String,
    #[validate(length(min = 1, message = "word_id is required"))]
    pub word_id: String,
    pub marked_for_review: Option<bool>,
}

/// Normalize a raw word reference to its catalog key form.
fn word_key(raw: &str) -> String {
    Word::surface_key(raw)
}

/// Combined entry point: one encounter plus optional flag overwrite.
async fn upsert_interaction(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpsertRequest>,
) -> Result<Json<crate::models::UserWord>> {
    validate_payload(&payload)?;
    let record = state
        .tracker
        .upsert_interaction(
            &payload.user_id,
            &word_key(&payload.word_id),
            payload.marked_for_review,
        )
        .await?;
    Ok(Json(record))
}

/// Record one encounter event.
async fn record_encounter(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<InteractionRequest>,
) -> Result<Json<crate::models::UserWord>> {
    validate_payload(&payload)?;
    let record = state
        .tracker
        .record_encounter(&payload.user_id, &word_key(&payload.word_id))
        .await?;
    Ok(Json(record))
}

/// Record one meaning-check event.
async fn record_check(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<InteractionRequest>,
) -> Result<Json<crate::models::UserWord>> {
    validate_payload(&payload)?;
    let record = state
        .tracker
        .record_check(&payload.user_id, &word_key(&payload.word_id))
        .await?;
    Ok(Json(record))
}

/// Flip the review flag for a pair.
async fn toggle_review(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<InteractionRequest>,
) -> Result<Json<crate::models::UserWord>> {
    validate_payload(&payload)?;
    let record = state
        .tracker
        .toggle_review(&payload.user_id, &word_key(&payload.word_id))
        .await?;
    Ok(Json(record))
}

/// All interaction records for a user, joined with their catalog entries.
async fn list_for_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<TrackedWord>>> {
    parse_id("userId", &user_id)?;
    Ok(Json(state.tracker.list_for_user(&user_id).await?))
}

/// Administrative partial update by record ID.
async fn update_interaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<InteractionPatch>,
) -> Result<Json<crate::models::UserWord>> {
    Ok(Json(state.tracker.update(&id, patch).await?))
}

/// Administrative delete by record ID.
async fn delete_interaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    state.tracker.delete(&id).await?;
    Ok(Json(
        serde_json::json!({ "message": "Interaction deleted successfully" }),
    ))
}
