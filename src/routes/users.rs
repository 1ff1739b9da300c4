// SPDX-License-Identifier: MIT

//! User CRUD routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::require_auth;
use crate::models::{DailyGoals, ProficiencyLevel, User};
use crate::validation::{parse_id, validate_level, validate_payload};
use crate::AppState;
use axum::{
    extract::{Path, State},
    handler::Handler,
    middleware,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// User routes. Deletion requires authentication; the rest is public.
pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(
                delete_user.layer(middleware::from_fn_with_state(state, require_auth)),
            ),
        )
}

/// User profile as returned by the API (no credential hash).
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub proficiency_level: ProficiencyLevel,
    pub learning_language: String,
    pub goals: DailyGoals,
    pub streak_days: u32,
    pub read_articles: Vec<String>,
    pub uploaded_articles: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            proficiency_level: user.proficiency_level,
            learning_language: user.learning_language.clone(),
            goals: user.goals.clone(),
            streak_days: user.streak_days,
            read_articles: user.read_articles.clone(),
            uploaded_articles: user.uploaded_articles.clone(),
            created_at: user.created_at.clone(),
            updated_at: user.updated_at.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(custom(function = validate_level))]
    pub proficiency_level: String,
    #[validate(length(min = 1, message = "Learning language is required"))]
    pub learning_language: String,
    #[validate(nested)]
    pub goals: Option<GoalsInput>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GoalsInput {
    #[validate(range(min = 1, message = "words_per_day must be a positive integer"))]
    pub words_per_day: Option<u32>,
    #[validate(range(min = 1, message = "articles_per_day must be a positive integer"))]
    pub articles_per_day: Option<u32>,
}

impl GoalsInput {
    fn merge_into(&self, goals: &mut DailyGoals) {
        if let Some(words) = self.words_per_day {
            goals.words_per_day = words;
        }
        if let Some(articles) = self.articles_per_day {
            goals.articles_per_day = articles;
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "First name must not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name must not be empty"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Enter a valid email"))]
    pub email: Option<String>,
    #[validate(custom(function = validate_level))]
    pub proficiency_level: Option<String>,
    #[validate(length(min = 1, message = "Learning language must not be empty"))]
    pub learning_language: Option<String>,
    #[validate(nested)]
    pub goals: Option<GoalsInput>,
    pub streak_days: Option<u32>,
    pub read_articles: Option<Vec<String>>,
    pub uploaded_articles: Option<Vec<String>>,
}

/// Get all users.
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserResponse>>> {
    let users = state.db.list_users().await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// Create a new user.
async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(axum::http::StatusCode, Json<UserResponse>)> {
    validate_payload(&payload)?;

    if state.db.find_user_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "A user with email {} already exists",
            payload.email
        )));
    }

    let mut goals = DailyGoals::default();
    if let Some(input) = &payload.goals {
        input.merge_into(&mut goals);
    }

    let now = chrono::Utc::now().to_rfc3339();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        password_hash: super::auth::hash_password(&payload.password)?,
        // Validated against the level list above, so parse cannot fail.
        proficiency_level: ProficiencyLevel::parse(&payload.proficiency_level)
            .ok_or_else(|| AppError::BadRequest("Invalid proficiency level".to_string()))?,
        learning_language: payload.learning_language,
        goals,
        streak_days: 0,
        read_articles: vec![],
        uploaded_articles: vec![],
        refresh_token: None,
        created_at: now.clone(),
        updated_at: now,
    };

    state.db.upsert_user(&user).await?;
    tracing::info!(user_id = %user.id, "User created");

    Ok((axum::http::StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Get a user by ID.
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>> {
    parse_id("id", &id)?;
    let user = state
        .db
        .get_user(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
    Ok(Json(UserResponse::from(&user)))
}

/// Partially update a user by ID.
async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    parse_id("id", &id)?;
    validate_payload(&payload)?;

    let mut user = state
        .db
        .get_user(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

    if let Some(email) = &payload.email {
        if email != &user.email {
            if let Some(other) = state.db.find_user_by_email(email).await? {
                if other.id != user.id {
                    return Err(AppError::Conflict(format!(
                        "A user with email {} already exists",
                        email
                    )));
                }
            }
            user.email = email.clone();
        }
    }
    if let Some(first_name) = payload.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = payload.last_name {
        user.last_name = last_name;
    }
    if let Some(level) = &payload.proficiency_level {
        user.proficiency_level = ProficiencyLevel::parse(level)
            .ok_or_else(|| AppError::BadRequest("Invalid proficiency level".to_string()))?;
    }
    if let Some(language) = payload.learning_language {
        user.learning_language = language;
    }
    if let Some(goals) = &payload.goals {
        goals.merge_into(&mut user.goals);
    }
    if let Some(streak) = payload.streak_days {
        user.streak_days = streak;
    }
    if let Some(read) = payload.read_articles {
        user.read_articles = read;
    }
    if let Some(uploaded) = payload.uploaded_articles {
        user.uploaded_articles = uploaded;
    }
    user.updated_at = chrono::Utc::now().to_rfc3339();

    state.db.upsert_user(&user).await?;
    Ok(Json(UserResponse::from(&user)))
}

#[derive(Serialize)]
struct DeleteResponse {
    message: String,
    deleted_documents: usize,
}

/// Delete a user and their interaction records.
async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    parse_id("id", &id)?;

    if state.db.get_user(&id).await?.is_none() {
        return Err(AppError::NotFound(format!("User {} not found", id)));
    }

    let deleted = state.db.delete_user_data(&id).await?;
    tracing::info!(user_id = %id, deleted, "User deleted");

    Ok(Json(DeleteResponse {
        message: "User deleted successfully".to_string(),
        deleted_documents: deleted,
    }))
}
