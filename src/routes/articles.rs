// SPDX-License-Identifier: MIT

//! Article routes.
//!
//! Articles are created in two phases: metadata first (content empty),
//! then content attached through the uploader-class endpoint matching
//! the article's `uploaded_by` tag.

use crate::error::{AppError, Result};
use crate::models::{Article, ArticleType, CURATOR_TAG};
use crate::validation::{
    parse_id, validate_article_type, validate_level, validate_payload, validate_uploader_tag,
    validate_uuid,
};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/articles", get(list_articles))
        .route("/articles/metadata", post(create_metadata))
        .route("/articles/upload-user", post(upload_user_content))
        .route("/articles/upload-curator", post(upload_curator_content))
        .route("/articles/{id}", get(get_article).delete(delete_article))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMetadataRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub tags: Option<Vec<String>>,
    #[validate(custom(function = validate_level))]
    pub difficulty_level: String,
    #[validate(custom(function = validate_article_type))]
    pub article_type: String,
    #[validate(custom(function = validate_uuid))]
    pub user_id: Option<String>,
    #[validate(custom(function = validate_uploader_tag))]
    pub uploaded_by: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UploadContentRequest {
    #[validate(custom(function = validate_uuid))]
    pub article_id: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Accepts the camelCase spelling too for client compatibility.
    #[serde(alias = "difficultyLevel")]
    pub difficulty_level: Option<String>,
    /// Comma-separated tag list; articles must carry every listed tag.
    pub tags: Option<String>,
}

/// Phase 1: create a content-less article from its metadata.
async fn create_metadata(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateMetadataRequest>,
) -> Result<(axum::http::StatusCode, Json<Article>)> {
    validate_payload(&payload)?;

    // Validated against the type list above, so parse cannot fail.
    let article_type = ArticleType::parse(&payload.article_type)
        .ok_or_else(|| AppError::BadRequest("Invalid article type".to_string()))?;

    if article_type == ArticleType::Custom && payload.user_id.is_none() {
        return Err(AppError::Validation(vec![crate::error::FieldError {
            field: "user_id".to_string(),
            message: "user_id is required for custom articles".to_string(),
        }]));
    }

    let article = Article {
        id: uuid::Uuid::new_v4().to_string(),
        title: payload.title,
        content: String::new(),
        tags: payload.tags.unwrap_or_default(),
        difficulty_level: payload.difficulty_level,
        article_type,
        user_id: payload.user_id,
        uploaded_by: payload.uploaded_by,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    state.db.upsert_article(&article).await?;
    tracing::info!(article_id = %article.id, "Article metadata created");

    Ok((axum::http::StatusCode::CREATED, Json(article)))
}

/// Phase 2: attach content to a user-authored article.
async fn upload_user_content(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UploadContentRequest>,
) -> Result<Json<Article>> {
    attach_content(&state, payload, false).await.map(Json)
}

/// Phase 2: attach content to a curator-authored article.
async fn upload_curator_content(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UploadContentRequest>,
) -> Result<Json<Article>> {
    attach_content(&state, payload, true).await.map(Json)
}

/// Shared phase-2 flow: the article's uploader class must match the
/// endpoint used.
async fn attach_content(
    state: &AppState,
    payload: UploadContentRequest,
    curator_endpoint: bool,
) -> Result<Article> {
    validate_payload(&payload)?;

    let mut article = state
        .db
        .get_article(&payload.article_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Article {} not found", payload.article_id)))?;

    if article.is_curator_authored() != curator_endpoint {
        let expected = if curator_endpoint {
            CURATOR_TAG
        } else {
            "a user"
        };
        return Err(AppError::Forbidden(format!(
            "Article was not uploaded by {}",
            expected
        )));
    }

    article.content = payload.content;
    state.db.upsert_article(&article).await?;
    tracing::info!(article_id = %article.id, "Article content attached");

    Ok(article)
}

/// List articles, optionally filtered by difficulty and/or tags.
async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Article>>> {
    if let Some(level) = &query.difficulty_level {
        if validate_level(level).is_err() {
            return Err(AppError::Validation(vec![crate::error::FieldError {
                field: "difficulty_level".to_string(),
                message: "must be Beginner, Intermediate, or Advanced".to_string(),
            }]));
        }
    }

    let mut articles = state
        .db
        .list_articles(query.difficulty_level.as_deref())
        .await?;

    if let Some(tags) = &query.tags {
        let wanted: Vec<&str> = tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        if !wanted.is_empty() {
            articles.retain(|article| {
                wanted
                    .iter()
                    .all(|tag| article.tags.iter().any(|t| t == tag))
            });
        }
    }

    Ok(Json(articles))
}

/// Get an article by ID.
async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Article>> {
    parse_id("id", &id)?;
    let article = state
        .db
        .get_article(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Article {} not found", id)))?;
    Ok(Json(article))
}

/// Delete an article by ID.
async fn delete_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    parse_id("id", &id)?;
    if state.db.get_article(&id).await?.is_none() {
        return Err(AppError::NotFound(format!("Article {} not found", id)));
    }
    state.db.delete_article(&id).await?;
    Ok(Json(
        serde_json::json!({ "message": "Article deleted successfully" }),
    ))
}
