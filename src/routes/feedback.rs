// SPDX-License-Identifier: MIT

//! Feedback routes. Submission is public; review is authenticated.

use crate::error::{AppError, Result};
use crate::middleware::auth::require_auth;
use crate::models::Feedback;
use crate::validation::{parse_id, validate_payload, validate_uuid};
use crate::AppState;
use axum::{
    extract::{Path, State},
    handler::Handler,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Feedback routes. Submission is public; listing, reading and deleting
/// require authentication.
pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let auth = middleware::from_fn_with_state(state, require_auth);
    Router::new()
        .route(
            "/feedback",
            post(submit_feedback).get(list_feedback.layer(auth.clone())),
        )
        .route(
            "/feedback/{id}",
            get(get_feedback.layer(auth.clone())).delete(delete_feedback.layer(auth)),
        )
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitFeedbackRequest {
    #[validate(custom(function = validate_uuid))]
    pub user_id: Option<String>,
    #[validate(length(min = 1, message = "Feedback text is required"))]
    pub feedback_text: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<u8>,
}

/// Submit feedback, optionally attributed to a user.
async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SubmitFeedbackRequest>,
) -> Result<(axum::http::StatusCode, Json<Feedback>)> {
    validate_payload(&payload)?;

    let feedback = Feedback {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: payload.user_id,
        feedback_text: payload.feedback_text,
        rating: payload.rating,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    state.db.upsert_feedback(&feedback).await?;
    tracing::info!(feedback_id = %feedback.id, "Feedback submitted");

    Ok((axum::http::StatusCode::CREATED, Json(feedback)))
}

/// Get all feedback entries.
async fn list_feedback(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Feedback>>> {
    Ok(Json(state.db.list_feedback().await?))
}

/// Get one feedback entry by ID.
async fn get_feedback(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Feedback>> {
    parse_id("id", &id)?;
    let feedback = state
        .db
        .get_feedback(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Feedback {} not found", id)))?;
    Ok(Json(feedback))
}

/// Delete a feedback entry by ID.
async fn delete_feedback(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    parse_id("id", &id)?;
    if state.db.get_feedback(&id).await?.is_none() {
        return Err(AppError::NotFound(format!("Feedback {} not found", id)));
    }
    state.db.delete_feedback(&id).await?;
    Ok(Json(
        serde_json::json!({ "message": "Feedback deleted successfully" }),
    ))
}
