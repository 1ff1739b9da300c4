// SPDX-License-Identifier: MIT

//! Word catalog routes.
//!
//! Words are keyed by their lowercased surface form, so lookups are
//! case-insensitive point reads and uniqueness is document identity.

use crate::error::{AppError, Result};
use crate::models::{Meaning, Word};
use crate::validation::{validate_payload, validate_uuid};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/words", get(list_words).post(create_word))
        .route("/words/getWord/{word}", get(get_word_by_surface))
        .route(
            "/words/{id}",
            get(get_word).put(update_word).delete(delete_word),
        )
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct MeaningInput {
    #[validate(length(min = 1, message = "Definition must not be empty"))]
    pub definition: String,
    pub usage_example: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWordRequest {
    #[validate(length(min = 1, message = "Word is required"))]
    pub word: String,
    #[validate(
        length(min = 1, message = "At least one meaning is required"),
        nested
    )]
    pub meanings: Vec<MeaningInput>,
    pub grammar_notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateWordRequest {
    #[validate(
        length(min = 1, message = "At least one meaning is required"),
        nested
    )]
    pub meanings: Option<Vec<MeaningInput>>,
    pub grammar_notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LookupQuery {
    /// Accepts the camelCase spelling too for client compatibility.
    #[serde(alias = "userId")]
    #[validate(custom(function = validate_uuid))]
    pub user_id: Option<String>,
}

/// Lookup response with the optional check side-effect warning.
#[derive(Serialize)]
struct LookupResponse {
    #[serde(flatten)]
    word: Word,
    #[serde(skip_serializing_if = "Option::is_none")]
    check_warning: Option<String>,
}

fn to_meanings(inputs: Vec<MeaningInput>) -> Vec<Meaning> {
    inputs
        .into_iter()
        .map(|m| Meaning {
            definition: m.definition,
            usage_example: m.usage_example,
        })
        .collect()
}

/// Get all catalog entries.
async fn list_words(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Word>>> {
    Ok(Json(state.db.list_words().await?))
}

/// Create a catalog entry. Duplicate surface form is a conflict.
async fn create_word(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateWordRequest>,
) -> Result<(axum::http::StatusCode, Json<Word>)> {
    validate_payload(&payload)?;

    let word = Word {
        word: payload.word.trim().to_string(),
        word_key: Word::surface_key(&payload.word),
        meanings: to_meanings(payload.meanings),
        grammar_notes: payload.grammar_notes,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    let (stored, created) = state.db.create_word_if_absent(&word).await?;
    if !created {
        return Err(AppError::Conflict(format!(
            "Word '{}' already exists",
            stored.word
        )));
    }

    tracing::info!(word_key = %word.word_key, "Word created");
    Ok((axum::http::StatusCode::CREATED, Json(stored)))
}

/// Get a catalog entry by its key.
async fn get_word(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Word>> {
    let word = state
        .db
        .get_word(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Word {} not found", id)))?;
    Ok(Json(word))
}

/// Update a catalog entry's meanings and notes. The surface form is the
/// document's identity and cannot change.
async fn update_word(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateWordRequest>,
) -> Result<Json<Word>> {
    validate_payload(&payload)?;

    let mut word = state
        .db
        .get_word(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Word {} not found", id)))?;

    if let Some(meanings) = payload.meanings {
        word.meanings = to_meanings(meanings);
    }
    if payload.grammar_notes.is_some() {
        word.grammar_notes = payload.grammar_notes;
    }

    state.db.upsert_word(&word).await?;
    Ok(Json(word))
}

/// Delete a catalog entry by its key.
async fn delete_word(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    if state.db.get_word(&id).await?.is_none() {
        return Err(AppError::NotFound(format!("Word {} not found", id)));
    }
    state.db.delete_word(&id).await?;
    Ok(Json(
        serde_json::json!({ "message": "Word deleted successfully" }),
    ))
}

/// Case-insensitive lookup by surface form. Never synthesizes.
///
/// With `user_id`, records a check event best-effort; a failure there is
/// reported in `check_warning` without failing the lookup.
async fn get_word_by_surface(
    State(state): State<Arc<AppState>>,
    Path(surface): Path<String>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<LookupResponse>> {
    validate_payload(&query)?;

    let lookup = state
        .catalog
        .lookup(&surface, query.user_id.as_deref())
        .await?;

    Ok(Json(LookupResponse {
        word: lookup.word,
        check_warning: lookup.check_warning,
    }))
}
