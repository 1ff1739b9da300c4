// SPDX-License-Identifier: MIT

//! Progress routes.

use crate::error::Result;
use crate::services::progress::{ArticleProgress, ProgressSummary, WordProgress};
use crate::validation::parse_id;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/progress/word/{user_id}", get(word_detail))
        .route("/progress/articles/{user_id}", get(article_detail))
        .route("/progress/{user_id}", get(summary))
}

/// Combined word + article progress summary.
async fn summary(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ProgressSummary>> {
    parse_id("userId", &user_id)?;
    Ok(Json(state.progress.summary(&user_id).await?))
}

/// Word-side progress detail.
async fn word_detail(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<WordProgress>> {
    parse_id("userId", &user_id)?;
    Ok(Json(state.progress.word_detail(&user_id).await?))
}

/// Article-side progress detail.
async fn article_detail(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ArticleProgress>> {
    parse_id("userId", &user_id)?;
    Ok(Json(state.progress.article_detail(&user_id).await?))
}
