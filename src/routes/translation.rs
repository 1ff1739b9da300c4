// SPDX-License-Identifier: MIT

//! Oracle-backed translation route.

use crate::error::Result;
use crate::models::Word;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/translation/word/{word}", get(translate_word))
}

#[derive(Serialize)]
struct TranslationResponse {
    #[serde(flatten)]
    word: Word,
    /// True when this request synthesized the entry from the oracle.
    synthesized: bool,
}

/// Resolve a word, consulting the definition oracle on a catalog miss.
///
/// A miss synthesizes and persists a new entry; a hit never touches the
/// oracle.
async fn translate_word(
    State(state): State<Arc<AppState>>,
    Path(surface): Path<String>,
) -> Result<Json<TranslationResponse>> {
    let (word, synthesized) = state.catalog.fetch_or_synthesize(&surface).await?;
    Ok(Json(TranslationResponse { word, synthesized }))
}
